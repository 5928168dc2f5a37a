//! Transfer tax policy
//!
//! A taxed transfer of `amount` is split as follows (truncating division):
//!
//! ```text
//! taxed  = amount * tax_bps        / 10000
//! burned = taxed  * burn_share_bps / 10000
//! fee    = taxed  * fee_share_bps  / 10000
//! net    = amount - burned - fee
//! ```
//!
//! Burn and fee are derived from `taxed` independently. The combined
//! `fee_share_bps + burn_share_bps` is capped at 10000, so `burned + fee`
//! never exceeds `taxed` and `net` never goes negative.

use crate::errors::{LedgerError, Result};
use myco_types::{
    is_valid_bps, mul_bps, AccountId, BasisPoints, TokenAmount, BASIS_POINTS_DENOM,
    DEFAULT_BURN_SHARE_BPS, DEFAULT_FEE_SHARE_BPS, DEFAULT_TAX_BPS,
};
use serde::{Deserialize, Serialize};

/// Parameter name reported when the fee and burn shares together exceed 100%.
pub const COMBINED_SHARES_PARAMETER: &str = "fee_share+burn_share";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    tax_bps: BasisPoints,
    fee_share_bps: BasisPoints,
    burn_share_bps: BasisPoints,
    destination: AccountId,
    enabled: bool,
}

/// Result of applying the policy to one amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSplit {
    pub gross: TokenAmount,
    pub taxed: TokenAmount,
    pub burned: TokenAmount,
    pub fee: TokenAmount,
    pub net: TokenAmount,
}

impl TaxPolicy {
    /// Default policy: enabled, all rates zero, fees routed to `destination`.
    pub fn new(destination: AccountId) -> Self {
        Self {
            tax_bps: DEFAULT_TAX_BPS,
            fee_share_bps: DEFAULT_FEE_SHARE_BPS,
            burn_share_bps: DEFAULT_BURN_SHARE_BPS,
            destination,
            enabled: true,
        }
    }

    pub fn tax_bps(&self) -> BasisPoints {
        self.tax_bps
    }

    pub fn fee_share_bps(&self) -> BasisPoints {
        self.fee_share_bps
    }

    pub fn burn_share_bps(&self) -> BasisPoints {
        self.burn_share_bps
    }

    pub fn destination(&self) -> AccountId {
        self.destination
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check every stored rate, e.g. after loading a persisted snapshot.
    pub fn validate(&self) -> Result<()> {
        check_bps("tax", self.tax_bps)?;
        check_bps("fee_share", self.fee_share_bps)?;
        check_bps("burn_share", self.burn_share_bps)?;
        check_combined(self.fee_share_bps, self.burn_share_bps)
    }

    /// Split `amount` under the current rates, ignoring the enabled flag.
    pub fn split(&self, amount: TokenAmount) -> TaxSplit {
        let taxed = mul_bps(amount, self.tax_bps);
        let burned = mul_bps(taxed, self.burn_share_bps);
        let fee = mul_bps(taxed, self.fee_share_bps);
        TaxSplit {
            gross: amount,
            taxed,
            burned,
            fee,
            net: amount - burned - fee,
        }
    }

    pub(crate) fn set_tax(&mut self, bps: BasisPoints) -> Result<()> {
        check_bps("tax", bps)?;
        self.tax_bps = bps;
        Ok(())
    }

    pub(crate) fn set_fee_share(&mut self, bps: BasisPoints) -> Result<()> {
        check_bps("fee_share", bps)?;
        check_combined(bps, self.burn_share_bps)?;
        self.fee_share_bps = bps;
        Ok(())
    }

    pub(crate) fn set_burn_share(&mut self, bps: BasisPoints) -> Result<()> {
        check_bps("burn_share", bps)?;
        check_combined(self.fee_share_bps, bps)?;
        self.burn_share_bps = bps;
        Ok(())
    }

    pub(crate) fn set_destination(&mut self, destination: AccountId) {
        self.destination = destination;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

fn check_bps(parameter: &'static str, bps: BasisPoints) -> Result<()> {
    if is_valid_bps(bps) {
        Ok(())
    } else {
        Err(LedgerError::InvalidParameter {
            parameter,
            value: bps as u32,
            max: BASIS_POINTS_DENOM as u32,
        })
    }
}

fn check_combined(fee_share: BasisPoints, burn_share: BasisPoints) -> Result<()> {
    let combined = fee_share as u32 + burn_share as u32;
    if combined > BASIS_POINTS_DENOM as u32 {
        return Err(LedgerError::InvalidParameter {
            parameter: COMBINED_SHARES_PARAMETER,
            value: combined,
            max: BASIS_POINTS_DENOM as u32,
        });
    }
    Ok(())
}
