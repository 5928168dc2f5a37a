//! Transfer engine
//!
//! Executes one transfer against the ledger sub-states it needs:
//!
//! 1. Reject if the ledger is paused.
//! 2. Zero amounts succeed with an all-zero receipt and touch nothing.
//! 3. If tax is disabled or either party holds `Excluded`, move the full
//!    amount.
//! 4. Otherwise split with the [`TaxPolicy`]: burn from the sender, route the
//!    fee to the tax destination, deliver the net amount.
//!
//! All movements of one transfer form a single settlement, so the sender's
//! balance is checked once against the gross amount and either every
//! movement lands or none does.

use crate::errors::Result;
use crate::pause::PauseGate;
use crate::roles::RoleRegistry;
use crate::supply::{Settlement, SupplyLedger};
use crate::tax::TaxPolicy;
use myco_types::{AccountId, Role, TokenAmount, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a successful transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub from: AccountId,
    pub to: AccountId,
    pub fee_destination: AccountId,
    /// Amount debited from the sender.
    pub gross: TokenAmount,
    pub burned: TokenAmount,
    pub fee: TokenAmount,
    /// Amount credited to the recipient.
    pub net: TokenAmount,
    /// Whether the tax split was applied.
    pub taxed: bool,
}

impl TransferReceipt {
    fn untaxed(
        from: AccountId,
        to: AccountId,
        fee_destination: AccountId,
        amount: TokenAmount,
    ) -> Self {
        Self {
            from,
            to,
            fee_destination,
            gross: amount,
            burned: U256::zero(),
            fee: U256::zero(),
            net: amount,
            taxed: false,
        }
    }
}

pub(crate) struct TransferEngine<'a> {
    pub pause: &'a PauseGate,
    pub roles: &'a RoleRegistry,
    pub tax: &'a TaxPolicy,
    pub supply: &'a mut SupplyLedger,
}

impl TransferEngine<'_> {
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: TokenAmount,
    ) -> Result<TransferReceipt> {
        self.pause.ensure_not_paused()?;

        let fee_destination = self.tax.destination();
        if amount.is_zero() {
            return Ok(TransferReceipt::untaxed(from, to, fee_destination, amount));
        }

        if !self.is_taxed(&from, &to) {
            self.supply.raw_transfer(from, to, amount)?;
            debug!(target: "ledger", %from, %to, %amount, "untaxed transfer");
            return Ok(TransferReceipt::untaxed(from, to, fee_destination, amount));
        }

        let split = self.tax.split(amount);
        self.supply
            .settle(&Settlement::taxed(from, &split, fee_destination, to))?;

        debug!(
            target: "ledger",
            %from,
            %to,
            gross = %split.gross,
            burned = %split.burned,
            fee = %split.fee,
            net = %split.net,
            "taxed transfer"
        );

        Ok(TransferReceipt {
            from,
            to,
            fee_destination,
            gross: split.gross,
            burned: split.burned,
            fee: split.fee,
            net: split.net,
            taxed: true,
        })
    }

    /// Exclusion of either party bypasses tax before any rate is consulted.
    fn is_taxed(&self, from: &AccountId, to: &AccountId) -> bool {
        self.tax.is_enabled()
            && !self.roles.has_role(Role::Excluded, from)
            && !self.roles.has_role(Role::Excluded, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;

    fn account(n: u8) -> AccountId {
        let mut id = [0u8; 32];
        id[0] = n;
        AccountId::new(id)
    }

    struct Fixture {
        pause: PauseGate,
        roles: RoleRegistry,
        tax: TaxPolicy,
        supply: SupplyLedger,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tax = TaxPolicy::new(account(9));
            tax.set_tax(1_000).unwrap();
            tax.set_fee_share(5_000).unwrap();
            tax.set_burn_share(5_000).unwrap();
            let mut supply = SupplyLedger::new();
            supply.mint(account(1), U256::from(1_000u64)).unwrap();
            Self {
                pause: PauseGate::new(),
                roles: RoleRegistry::new(),
                tax,
                supply,
            }
        }

        fn transfer(&mut self, from: u8, to: u8, amount: u64) -> Result<TransferReceipt> {
            TransferEngine {
                pause: &self.pause,
                roles: &self.roles,
                tax: &self.tax,
                supply: &mut self.supply,
            }
            .transfer(account(from), account(to), U256::from(amount))
        }
    }

    #[test]
    fn taxed_transfer_splits_amount() {
        let mut fx = Fixture::new();
        let receipt = fx.transfer(1, 2, 100).unwrap();
        assert!(receipt.taxed);
        assert_eq!(receipt.burned, U256::from(5u64));
        assert_eq!(receipt.fee, U256::from(5u64));
        assert_eq!(receipt.net, U256::from(90u64));
        assert_eq!(fx.supply.balance_of(&account(1)), U256::from(900u64));
        assert_eq!(fx.supply.balance_of(&account(2)), U256::from(90u64));
        assert_eq!(fx.supply.balance_of(&account(9)), U256::from(5u64));
        assert_eq!(fx.supply.total_supply(), U256::from(995u64));
        assert!(fx.supply.is_conserved());
    }

    #[test]
    fn excluded_recipient_bypasses_tax() {
        let mut fx = Fixture::new();
        fx.roles.insert(Role::Excluded, account(2));
        let receipt = fx.transfer(1, 2, 100).unwrap();
        assert!(!receipt.taxed);
        assert_eq!(fx.supply.balance_of(&account(2)), U256::from(100u64));
        assert_eq!(fx.supply.total_supply(), U256::from(1_000u64));
    }

    #[test]
    fn excluded_sender_bypasses_tax() {
        let mut fx = Fixture::new();
        fx.roles.insert(Role::Excluded, account(1));
        let receipt = fx.transfer(1, 2, 100).unwrap();
        assert_eq!(receipt.net, U256::from(100u64));
        assert_eq!(fx.supply.balance_of(&account(9)), U256::zero());
    }

    #[test]
    fn disabled_tax_moves_full_amount() {
        let mut fx = Fixture::new();
        fx.tax.set_enabled(false);
        let receipt = fx.transfer(1, 2, 100).unwrap();
        assert!(!receipt.taxed);
        assert_eq!(fx.supply.balance_of(&account(2)), U256::from(100u64));
    }

    #[test]
    fn paused_rejects_before_anything_else() {
        let mut fx = Fixture::new();
        fx.pause.pause().unwrap();
        assert_eq!(fx.transfer(1, 2, 0).unwrap_err(), LedgerError::Paused);
        assert_eq!(fx.transfer(5, 2, 100).unwrap_err(), LedgerError::Paused);
    }

    #[test]
    fn zero_amount_is_noop() {
        let mut fx = Fixture::new();
        let before = fx.supply.clone();
        let receipt = fx.transfer(3, 2, 0).unwrap();
        assert_eq!(receipt.gross, U256::zero());
        assert_eq!(receipt.net, U256::zero());
        assert_eq!(receipt.burned, U256::zero());
        assert_eq!(receipt.fee, U256::zero());
        assert_eq!(fx.supply, before);
    }

    #[test]
    fn insufficient_balance_is_checked_against_gross() {
        let mut fx = Fixture::new();
        let before = fx.supply.clone();
        let err = fx.transfer(1, 2, 1_001).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: account(1),
                available: U256::from(1_000u64),
                required: U256::from(1_001u64),
            }
        );
        assert_eq!(fx.supply, before);
    }

    #[test]
    fn sender_may_be_fee_destination() {
        let mut fx = Fixture::new();
        fx.tax.set_destination(account(1));
        fx.transfer(1, 2, 100).unwrap();
        assert_eq!(fx.supply.balance_of(&account(1)), U256::from(905u64));
        assert_eq!(fx.supply.balance_of(&account(2)), U256::from(90u64));
        assert!(fx.supply.is_conserved());
    }
}
