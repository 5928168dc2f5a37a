//! Delegated spending allowances (owner -> spender -> amount)

use crate::errors::{LedgerError, Result};
use myco_types::{AccountId, TokenAmount, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
    entries: BTreeMap<AccountId, BTreeMap<AccountId, TokenAmount>>,
}

impl Allowances {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.entries
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn set(&mut self, owner: AccountId, spender: AccountId, amount: TokenAmount) {
        if amount.is_zero() {
            if let Some(spenders) = self.entries.get_mut(&owner) {
                spenders.remove(&spender);
                if spenders.is_empty() {
                    self.entries.remove(&owner);
                }
            }
        } else {
            self.entries.entry(owner).or_default().insert(spender, amount);
        }
    }

    pub(crate) fn ensure(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: TokenAmount,
    ) -> Result<()> {
        let available = self.allowance(owner, spender);
        if available < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                available,
                required: amount,
            });
        }
        Ok(())
    }

    /// Deduct `amount` after a successful spend. `U256::MAX` never decreases.
    pub(crate) fn consume(&mut self, owner: AccountId, spender: AccountId, amount: TokenAmount) {
        let available = self.allowance(&owner, &spender);
        if available == U256::MAX {
            return;
        }
        self.set(owner, spender, available.saturating_sub(amount));
    }
}
