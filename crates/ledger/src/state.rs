//! Complete ledger state
//!
//! One owned value holds every sub-state. Entry points hand each component
//! only the part it works on. The same value is the persistence snapshot.

use crate::allowances::Allowances;
use crate::errors::LedgerError;
use crate::events::EventLog;
use crate::pause::PauseGate;
use crate::roles::RoleRegistry;
use crate::supply::SupplyLedger;
use crate::tax::TaxPolicy;
use myco_types::{AccountId, TokenAmount};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub initialized: bool,
    pub roles: RoleRegistry,
    pub supply: SupplyLedger,
    pub pause: PauseGate,
    pub tax: TaxPolicy,
    pub allowances: Allowances,
    pub events: EventLog,
}

/// A snapshot that breaks a ledger invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateInvariantError {
    #[error("sum of balances ({sum:?}) does not match total supply {total_supply}")]
    SupplyMismatch {
        sum: Option<TokenAmount>,
        total_supply: TokenAmount,
    },
    #[error("stored tax parameters are invalid: {0}")]
    InvalidTax(#[from] LedgerError),
    #[error("event journal sequence numbers are out of order")]
    EventSequence,
    #[error("uninitialized ledger carries state")]
    UninitializedWithState,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            initialized: false,
            roles: RoleRegistry::new(),
            supply: SupplyLedger::new(),
            pause: PauseGate::new(),
            tax: TaxPolicy::new(AccountId::new([0u8; 32])),
            allowances: Allowances::new(),
            events: EventLog::new(),
        }
    }
}

impl LedgerState {
    /// Check the invariants a loaded snapshot must satisfy.
    pub fn verify(&self) -> Result<(), StateInvariantError> {
        if !self.supply.is_conserved() {
            return Err(StateInvariantError::SupplyMismatch {
                sum: self.supply.sum_of_balances(),
                total_supply: self.supply.total_supply(),
            });
        }
        self.tax.validate()?;
        if !self.events.is_consistent() {
            return Err(StateInvariantError::EventSequence);
        }
        if !self.initialized && !self.supply.total_supply().is_zero() {
            return Err(StateInvariantError::UninitializedWithState);
        }
        Ok(())
    }
}
