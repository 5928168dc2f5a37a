//! Thread-safe ledger handle
//!
//! Mutations take the write lock for their full duration so each operation
//! is observed atomically. Queries share the read lock.

use crate::errors::Result;
use crate::events::RecordedEvent;
use crate::state::LedgerState;
use crate::token::Token;
use crate::transfer::TransferReceipt;
use myco_types::{AccountId, Role, TokenAmount};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Token>>,
}

impl SharedToken {
    pub fn new(token: Token) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Token) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Token) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn snapshot(&self) -> LedgerState {
        self.read(|token| token.state().clone())
    }

    pub fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.read(|token| token.balance_of(account))
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.read(Token::total_supply)
    }

    pub fn has_role(&self, role: Role, account: &AccountId) -> bool {
        self.read(|token| token.has_role(role, account))
    }

    pub fn paused(&self) -> bool {
        self.read(Token::paused)
    }

    pub fn events_since(&self, sequence: u64) -> Vec<RecordedEvent> {
        self.read(|token| token.events_since(sequence).to_vec())
    }

    pub fn transfer(
        &self,
        caller: AccountId,
        to: AccountId,
        amount: TokenAmount,
    ) -> Result<TransferReceipt> {
        self.write(|token| token.transfer(caller, to, amount))
    }

    pub fn mint(&self, caller: AccountId, to: AccountId, amount: TokenAmount) -> Result<()> {
        self.write(|token| token.mint(caller, to, amount))
    }

    pub fn pause(&self, caller: AccountId) -> Result<()> {
        self.write(|token| token.pause(caller))
    }

    pub fn unpause(&self, caller: AccountId) -> Result<()> {
        self.write(|token| token.unpause(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myco_types::U256;
    use std::thread;

    fn account(n: u8) -> AccountId {
        let mut id = [0u8; 32];
        id[0] = n;
        AccountId::new(id)
    }

    #[test]
    fn concurrent_transfers_conserve_supply() {
        let deployer = account(1);
        let mut token = Token::new();
        token.initialize(deployer).unwrap();
        token.update_tax(deployer, 1_000).unwrap();
        token.update_burn(deployer, 5_000).unwrap();
        token.renounce_role(deployer, Role::Excluded, deployer).unwrap();
        let shared = SharedToken::new(token);

        let handles: Vec<_> = (2u8..6)
            .map(|n| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        shared
                            .transfer(deployer, account(n), U256::from(1_000u64))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = shared.snapshot();
        assert!(snapshot.supply.is_conserved());
        let restored = Token::from_state(snapshot).unwrap();
        assert_eq!(restored, shared.read(Token::clone));
        for n in 2u8..6 {
            assert_eq!(shared.balance_of(&account(n)), U256::from(50u64 * 950));
        }
        let burned = U256::from(4u64 * 50 * 50);
        assert_eq!(shared.total_supply(), myco_types::initial_supply() - burned);
    }

    #[test]
    fn pause_is_visible_to_other_handles() {
        let deployer = account(1);
        let mut token = Token::new();
        token.initialize(deployer).unwrap();
        let shared = SharedToken::new(token);
        let other = shared.clone();

        shared.pause(deployer).unwrap();
        assert!(other.paused());
        assert!(other.transfer(deployer, account(2), U256::one()).is_err());
    }
}
