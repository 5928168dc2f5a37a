//! Privileged entry points
//!
//! Every operation here checks the caller's role first, then the pause flag
//! where it applies, then its parameters. Rejected calls leave the ledger
//! untouched and record no event.

use crate::errors::{LedgerError, Result};
use crate::events::LedgerEvent;
use crate::token::Token;
use myco_types::{AccountId, BasisPoints, Role, TokenAmount};
use tracing::{info, warn};

impl Token {
    fn authorize(&self, caller: &AccountId, role: Role, operation: &'static str) -> Result<()> {
        self.state.roles.ensure_role(caller, role).inspect_err(|_| {
            warn!(target: "ledger", %caller, %role, operation, "unauthorized call rejected");
        })
    }

    /// Create `amount` new tokens for `to`. Requires `Minter`.
    pub fn mint(&mut self, caller: AccountId, to: AccountId, amount: TokenAmount) -> Result<()> {
        self.authorize(&caller, Role::Minter, "mint")?;
        self.state.pause.ensure_not_paused()?;
        self.state.supply.mint(to, amount)?;

        self.state.events.record(LedgerEvent::Minted {
            by: caller,
            to,
            amount,
        });
        info!(
            target: "ledger",
            %caller,
            %to,
            %amount,
            total_supply = %self.state.supply.total_supply(),
            "minted"
        );
        Ok(())
    }

    pub fn pause(&mut self, caller: AccountId) -> Result<()> {
        self.authorize(&caller, Role::Pauser, "pause")?;
        self.state.pause.pause()?;
        self.state.events.record(LedgerEvent::Paused { by: caller });
        info!(target: "ledger", %caller, "ledger paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: AccountId) -> Result<()> {
        self.authorize(&caller, Role::Pauser, "unpause")?;
        self.state.pause.unpause()?;
        self.state.events.record(LedgerEvent::Unpaused { by: caller });
        info!(target: "ledger", %caller, "ledger unpaused");
        Ok(())
    }

    /// Grant `role` to `account`. Requires `Admin`. Returns whether
    /// membership changed.
    pub fn grant_role(
        &mut self,
        caller: AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<bool> {
        self.authorize(&caller, Role::Admin, "grant_role")?;
        let changed = self.state.roles.grant(&caller, role, account)?;
        if changed {
            self.state.events.record(LedgerEvent::RoleGranted {
                role,
                account,
                by: caller,
            });
            info!(target: "ledger", %caller, %role, %account, "role granted");
        }
        Ok(changed)
    }

    /// Revoke `role` from `account`. Requires `Admin`. Returns whether
    /// membership changed.
    pub fn revoke_role(
        &mut self,
        caller: AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<bool> {
        self.authorize(&caller, Role::Admin, "revoke_role")?;
        let changed = self.state.roles.revoke(&caller, role, &account)?;
        if changed {
            self.state.events.record(LedgerEvent::RoleRevoked {
                role,
                account,
                by: caller,
            });
            info!(target: "ledger", %caller, %role, %account, "role revoked");
        }
        Ok(changed)
    }

    /// Drop the caller's own membership of `role`.
    pub fn renounce_role(
        &mut self,
        caller: AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<bool> {
        if caller != account {
            warn!(
                target: "ledger",
                %caller,
                %role,
                %account,
                "renounce for another account rejected"
            );
            return Err(LedgerError::Unauthorized {
                account: caller,
                role,
            });
        }
        let changed = self.state.roles.remove(role, &account);
        if changed {
            self.state.events.record(LedgerEvent::RoleRevoked {
                role,
                account,
                by: caller,
            });
            info!(target: "ledger", %caller, %role, "role renounced");
        }
        Ok(changed)
    }

    /// Set the overall tax rate. Requires `Governor`.
    pub fn update_tax(&mut self, caller: AccountId, bps: BasisPoints) -> Result<()> {
        self.authorize(&caller, Role::Governor, "update_tax")?;
        self.state.tax.set_tax(bps)?;
        self.state.events.record(LedgerEvent::TaxUpdated { by: caller, bps });
        info!(target: "ledger", %caller, bps, "tax rate updated");
        Ok(())
    }

    /// Set the fee share of the taxed amount. Requires `Governor`.
    pub fn update_ccf(&mut self, caller: AccountId, bps: BasisPoints) -> Result<()> {
        self.authorize(&caller, Role::Governor, "update_ccf")?;
        self.state.tax.set_fee_share(bps)?;
        self.state
            .events
            .record(LedgerEvent::FeeShareUpdated { by: caller, bps });
        info!(target: "ledger", %caller, bps, "fee share updated");
        Ok(())
    }

    /// Set the burn share of the taxed amount. Requires `Governor`.
    pub fn update_burn(&mut self, caller: AccountId, bps: BasisPoints) -> Result<()> {
        self.authorize(&caller, Role::Governor, "update_burn")?;
        self.state.tax.set_burn_share(bps)?;
        self.state
            .events
            .record(LedgerEvent::BurnShareUpdated { by: caller, bps });
        info!(target: "ledger", %caller, bps, "burn share updated");
        Ok(())
    }

    /// Route future fees to `destination`. Requires `Governor`.
    pub fn update_tax_destination(
        &mut self,
        caller: AccountId,
        destination: AccountId,
    ) -> Result<()> {
        self.authorize(&caller, Role::Governor, "update_tax_destination")?;
        self.state.tax.set_destination(destination);
        self.state.events.record(LedgerEvent::TaxDestinationUpdated {
            by: caller,
            destination,
        });
        info!(target: "ledger", %caller, %destination, "tax destination updated");
        Ok(())
    }

    pub fn enable_tax(&mut self, caller: AccountId) -> Result<()> {
        self.authorize(&caller, Role::Governor, "enable_tax")?;
        self.state.tax.set_enabled(true);
        self.state.events.record(LedgerEvent::TaxEnabled { by: caller });
        info!(target: "ledger", %caller, "tax enabled");
        Ok(())
    }

    pub fn disable_tax(&mut self, caller: AccountId) -> Result<()> {
        self.authorize(&caller, Role::Governor, "disable_tax")?;
        self.state.tax.set_enabled(false);
        self.state.events.record(LedgerEvent::TaxDisabled { by: caller });
        info!(target: "ledger", %caller, "tax disabled");
        Ok(())
    }
}
