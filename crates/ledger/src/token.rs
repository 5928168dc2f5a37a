//! Public ledger entry points
//!
//! [`Token`] owns the [`LedgerState`] and exposes initialization, the
//! unauthenticated queries and the holder-level operations (transfer,
//! approve, transfer-from). Privileged entry points live in `admin.rs`.

use crate::errors::{LedgerError, Result};
use crate::events::{LedgerEvent, RecordedEvent};
use crate::state::{LedgerState, StateInvariantError};
use crate::tax::TaxPolicy;
use crate::transfer::{TransferEngine, TransferReceipt};
use myco_types::{
    initial_supply, AccountId, BasisPoints, Role, TokenAmount, TOKEN_DECIMALS, TOKEN_NAME,
    TOKEN_SYMBOL,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub(crate) state: LedgerState,
}

impl Token {
    /// An uninitialized ledger. Call [`Token::initialize`] before use.
    pub fn new() -> Self {
        Self {
            state: LedgerState::default(),
        }
    }

    /// Rebuild a ledger from a persisted snapshot after checking its invariants.
    pub fn from_state(state: LedgerState) -> std::result::Result<Self, StateInvariantError> {
        state.verify()?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn into_state(self) -> LedgerState {
        self.state
    }

    /// One-time genesis: mint the initial supply to `deployer`, grant it every
    /// role, route fees to it and leave the ledger unpaused.
    pub fn initialize(&mut self, deployer: AccountId) -> Result<()> {
        if self.state.initialized {
            return Err(LedgerError::AlreadyInitialized);
        }

        let supply = initial_supply();
        let mut state = LedgerState {
            initialized: true,
            tax: TaxPolicy::new(deployer),
            ..LedgerState::default()
        };
        state.supply.mint(deployer, supply)?;
        for role in Role::ALL {
            state.roles.insert(role, deployer);
        }

        state.events.record(LedgerEvent::Initialized {
            deployer,
            initial_supply: supply,
        });
        state.events.record(LedgerEvent::Minted {
            by: deployer,
            to: deployer,
            amount: supply,
        });
        for role in Role::ALL {
            state.events.record(LedgerEvent::RoleGranted {
                role,
                account: deployer,
                by: deployer,
            });
        }

        self.state = state;
        info!(target: "ledger", %deployer, %supply, "ledger initialized");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Metadata and queries
    // ---------------------------------------------------------------------

    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    pub fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.state.supply.balance_of(account)
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.state.supply.total_supply()
    }

    pub fn has_role(&self, role: Role, account: &AccountId) -> bool {
        self.state.roles.has_role(role, account)
    }

    pub fn roles_of(&self, account: &AccountId) -> Vec<Role> {
        self.state.roles.roles_of(account)
    }

    pub fn role_members(&self, role: Role) -> Vec<AccountId> {
        self.state.roles.members(role).copied().collect()
    }

    pub fn paused(&self) -> bool {
        self.state.pause.is_paused()
    }

    /// Whether the transfer tax is enabled.
    pub fn taxed(&self) -> bool {
        self.state.tax.is_enabled()
    }

    /// Overall tax rate in basis points.
    pub fn the_tax(&self) -> BasisPoints {
        self.state.tax.tax_bps()
    }

    /// Fee share of the taxed amount in basis points.
    pub fn ccf_tax(&self) -> BasisPoints {
        self.state.tax.fee_share_bps()
    }

    /// Burn share of the taxed amount in basis points.
    pub fn burn_tax(&self) -> BasisPoints {
        self.state.tax.burn_share_bps()
    }

    pub fn tax_destination(&self) -> AccountId {
        self.state.tax.destination()
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.state.allowances.allowance(owner, spender)
    }

    pub fn events(&self) -> &[RecordedEvent] {
        self.state.events.entries()
    }

    pub fn events_since(&self, sequence: u64) -> &[RecordedEvent] {
        self.state.events.since(sequence)
    }

    // ---------------------------------------------------------------------
    // Holder operations
    // ---------------------------------------------------------------------

    /// Transfer `amount` from `caller` to `to`, applying tax unless bypassed.
    pub fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: TokenAmount,
    ) -> Result<TransferReceipt> {
        let receipt = self.engine().transfer(caller, to, amount)?;
        self.record_receipt(&receipt);
        Ok(receipt)
    }

    /// Allow `spender` to move up to `amount` of `caller`'s tokens.
    pub fn approve(
        &mut self,
        caller: AccountId,
        spender: AccountId,
        amount: TokenAmount,
    ) -> Result<()> {
        self.state.allowances.set(caller, spender, amount);
        self.state.events.record(LedgerEvent::Approval {
            owner: caller,
            spender,
            amount,
        });
        debug!(target: "ledger", owner = %caller, %spender, %amount, "approval set");
        Ok(())
    }

    /// Spend `amount` of `from`'s allowance granted to `caller`.
    ///
    /// The allowance is reduced by the gross amount only once the transfer
    /// has succeeded.
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: TokenAmount,
    ) -> Result<TransferReceipt> {
        self.state.pause.ensure_not_paused()?;
        self.state.allowances.ensure(&from, &caller, amount)?;

        let receipt = self.engine().transfer(from, to, amount)?;
        self.state.allowances.consume(from, caller, amount);
        self.record_receipt(&receipt);
        Ok(receipt)
    }

    fn engine(&mut self) -> TransferEngine<'_> {
        TransferEngine {
            pause: &self.state.pause,
            roles: &self.state.roles,
            tax: &self.state.tax,
            supply: &mut self.state.supply,
        }
    }

    fn record_receipt(&mut self, receipt: &TransferReceipt) {
        if receipt.gross.is_zero() {
            return;
        }
        let events = &mut self.state.events;
        if !receipt.burned.is_zero() {
            events.record(LedgerEvent::Burned {
                from: receipt.from,
                amount: receipt.burned,
            });
        }
        if !receipt.fee.is_zero() {
            events.record(LedgerEvent::Transfer {
                from: receipt.from,
                to: receipt.fee_destination,
                amount: receipt.fee,
            });
        }
        events.record(LedgerEvent::Transfer {
            from: receipt.from,
            to: receipt.to,
            amount: receipt.net,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myco_types::U256;

    fn account(n: u8) -> AccountId {
        let mut id = [0u8; 32];
        id[0] = n;
        AccountId::new(id)
    }

    fn initialized(deployer: AccountId) -> Token {
        let mut token = Token::new();
        token.initialize(deployer).unwrap();
        token
    }

    #[test]
    fn initialize_sets_genesis_state() {
        let deployer = account(1);
        let token = initialized(deployer);

        assert_eq!(token.name(), "MYCO Token");
        assert_eq!(token.symbol(), "MYCO");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), initial_supply());
        assert_eq!(token.balance_of(&deployer), initial_supply());
        assert_eq!(token.roles_of(&deployer), Role::ALL.to_vec());
        assert!(!token.paused());
        assert!(token.taxed());
        assert_eq!(token.tax_destination(), deployer);
        assert_eq!(token.the_tax(), 0);
        assert_eq!(token.ccf_tax(), 0);
        assert_eq!(token.burn_tax(), 0);
        assert_eq!(token.events().len(), 2 + Role::ALL.len());
    }

    #[test]
    fn initialize_only_once() {
        let mut token = initialized(account(1));
        let before = token.clone();
        assert_eq!(
            token.initialize(account(2)).unwrap_err(),
            LedgerError::AlreadyInitialized
        );
        assert_eq!(token, before);
    }

    #[test]
    fn transfer_records_events() {
        let deployer = account(1);
        let mut token = initialized(deployer);
        let seq = token.events().len() as u64;

        token.transfer(deployer, account(2), U256::from(10u64)).unwrap();
        let recent = token.events_since(seq);
        assert_eq!(recent.len(), 1);
        assert_eq!(
            recent[0].event,
            LedgerEvent::Transfer {
                from: deployer,
                to: account(2),
                amount: U256::from(10u64)
            }
        );

        token.transfer(deployer, account(2), U256::zero()).unwrap();
        assert_eq!(token.events_since(seq).len(), 1);
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let deployer = account(1);
        let spender = account(2);
        let mut token = initialized(deployer);

        token.approve(deployer, spender, U256::from(100u64)).unwrap();
        token
            .transfer_from(spender, deployer, account(3), U256::from(60u64))
            .unwrap();
        assert_eq!(token.allowance(&deployer, &spender), U256::from(40u64));
        assert_eq!(token.balance_of(&account(3)), U256::from(60u64));

        let err = token
            .transfer_from(spender, deployer, account(3), U256::from(41u64))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientAllowance {
                owner: deployer,
                spender,
                available: U256::from(40u64),
                required: U256::from(41u64),
            }
        );
    }

    #[test]
    fn failed_transfer_from_keeps_allowance() {
        let deployer = account(1);
        let holder = account(2);
        let spender = account(3);
        let mut token = initialized(deployer);

        token.transfer(deployer, holder, U256::from(10u64)).unwrap();
        token.approve(holder, spender, U256::from(50u64)).unwrap();
        let err = token
            .transfer_from(spender, holder, account(4), U256::from(20u64))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(token.allowance(&holder, &spender), U256::from(50u64));
    }

    #[test]
    fn from_state_rejects_broken_snapshot() {
        let token = initialized(account(1));
        let mut state = token.into_state();
        state.supply = Default::default();
        state.supply.mint(account(1), U256::from(5u64)).unwrap();
        assert!(Token::from_state(state.clone()).is_ok());

        let mut broken = state;
        broken.initialized = false;
        assert_eq!(
            Token::from_state(broken).unwrap_err(),
            StateInvariantError::UninitializedWithState
        );
    }
}
