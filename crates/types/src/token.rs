//! MYCO token metadata and genesis constants

use crate::amount::{BasisPoints, TokenAmount, U256};

pub const TOKEN_NAME: &str = "MYCO Token";
pub const TOKEN_SYMBOL: &str = "MYCO";
pub const TOKEN_DECIMALS: u8 = 18;

/// Whole tokens minted to the deployer at initialization.
pub const INITIAL_SUPPLY_TOKENS: u64 = 10_000_000_000;

/// Default overall tax applied after initialization.
pub const DEFAULT_TAX_BPS: BasisPoints = 0;
/// Default fee share of the taxed amount.
pub const DEFAULT_FEE_SHARE_BPS: BasisPoints = 0;
/// Default burn share of the taxed amount.
pub const DEFAULT_BURN_SHARE_BPS: BasisPoints = 0;

/// One whole token expressed in base units (10^18).
pub fn one_token() -> TokenAmount {
    U256::exp10(TOKEN_DECIMALS as usize)
}

/// Initial supply in base units: 10_000_000_000 * 10^18.
pub fn initial_supply() -> TokenAmount {
    U256::from(INITIAL_SUPPLY_TOKENS) * one_token()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_supply_in_base_units() {
        let expected = U256::from_dec_str("10000000000000000000000000000").unwrap();
        assert_eq!(initial_supply(), expected);
    }
}
