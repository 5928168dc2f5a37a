//! Balance table and total supply
//!
//! Every debit goes through [`SupplyLedger::settle`]: the full amount leaving
//! the sender is validated once, the resulting balances are staged, and only
//! then written back. A rejected settlement leaves no trace.
//!
//! ## Invariants
//! - `total_supply == sum(balances)` after every operation
//! - zero balances are not stored; absent accounts read as zero

use crate::errors::{LedgerError, Result};
use crate::tax::TaxSplit;
use myco_types::{AccountId, TokenAmount, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single credit produced by a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Credit {
    pub account: AccountId,
    pub amount: TokenAmount,
}

/// One atomic debit of `gross` from `from`, split into a burned portion and
/// any number of credits. `burned + sum(credits) == gross`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settlement {
    pub from: AccountId,
    pub gross: TokenAmount,
    pub burned: TokenAmount,
    pub credits: Vec<Credit>,
}

impl Settlement {
    /// Destroy `amount` held by `from`.
    pub fn burn(from: AccountId, amount: TokenAmount) -> Self {
        Self {
            from,
            gross: amount,
            burned: amount,
            credits: Vec::new(),
        }
    }

    /// Move `amount` from `from` to `to` without touching supply.
    pub fn transfer(from: AccountId, to: AccountId, amount: TokenAmount) -> Self {
        Self::burn(from, U256::zero()).credit(to, amount)
    }

    /// Burn, fee and net legs of a taxed transfer.
    pub fn taxed(
        from: AccountId,
        split: &TaxSplit,
        fee_destination: AccountId,
        to: AccountId,
    ) -> Self {
        Self::burn(from, split.burned)
            .credit(fee_destination, split.fee)
            .credit(to, split.net)
    }

    /// Add a credit leg, growing the gross debit by the same amount.
    pub fn credit(mut self, account: AccountId, amount: TokenAmount) -> Self {
        self.gross = self.gross.saturating_add(amount);
        self.credits.push(Credit { account, amount });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyLedger {
    balances: BTreeMap<AccountId, TokenAmount>,
    total_supply: TokenAmount,
}

impl SupplyLedger {
    pub fn new() -> Self {
        Self {
            balances: BTreeMap::new(),
            total_supply: U256::zero(),
        }
    }

    pub fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    /// Accounts with a non-zero balance, in ascending id order.
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, &TokenAmount)> {
        self.balances.iter()
    }

    /// Sum of all balances, or `None` if it does not fit in 256 bits.
    pub fn sum_of_balances(&self) -> Option<TokenAmount> {
        self.balances
            .values()
            .try_fold(U256::zero(), |acc, balance| acc.checked_add(*balance))
    }

    /// Whether the supply invariant holds.
    pub fn is_conserved(&self) -> bool {
        self.sum_of_balances() == Some(self.total_supply)
    }

    /// Create `amount` new tokens in `to`.
    pub(crate) fn mint(&mut self, to: AccountId, amount: TokenAmount) -> Result<()> {
        let overflow = || LedgerError::Overflow {
            total_supply: self.total_supply,
            amount,
        };
        let new_supply = self.total_supply.checked_add(amount).ok_or_else(overflow)?;
        let new_balance = self.balance_of(&to).checked_add(amount).ok_or_else(overflow)?;

        self.total_supply = new_supply;
        self.write_balance(to, new_balance);
        Ok(())
    }

    /// Move `amount` from `from` to `to` without touching supply.
    pub(crate) fn raw_transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: TokenAmount,
    ) -> Result<()> {
        self.settle(&Settlement::transfer(from, to, amount))
    }

    /// Apply a settlement atomically.
    pub(crate) fn settle(&mut self, settlement: &Settlement) -> Result<()> {
        debug_assert_eq!(
            settlement
                .credits
                .iter()
                .fold(settlement.burned, |acc, credit| acc + credit.amount),
            settlement.gross,
            "settlement parts must sum to the gross amount"
        );

        let available = self.balance_of(&settlement.from);
        if available < settlement.gross {
            return Err(LedgerError::InsufficientBalance {
                account: settlement.from,
                available,
                required: settlement.gross,
            });
        }

        let mut staged: BTreeMap<AccountId, TokenAmount> = BTreeMap::new();
        staged.insert(settlement.from, available - settlement.gross);
        for credit in &settlement.credits {
            if credit.amount.is_zero() {
                continue;
            }
            let entry = staged
                .entry(credit.account)
                .or_insert_with(|| self.balance_of(&credit.account));
            // Bounded by total supply, which fits by construction.
            *entry = entry.saturating_add(credit.amount);
        }

        self.total_supply = self.total_supply.saturating_sub(settlement.burned);
        for (account, balance) in staged {
            self.write_balance(account, balance);
        }
        Ok(())
    }

    fn write_balance(&mut self, account: AccountId, balance: TokenAmount) {
        if balance.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}
