//! Token amounts and basis-point arithmetic
//!
//! Balances and supply are unsigned 256-bit integers in the token's smallest
//! unit. Percentages are expressed in basis points (10000 = 100%) and applied
//! with truncating integer division. No floating point anywhere.

pub use primitive_types::U256;

/// Amount of tokens in the smallest unit (10^-18 MYCO).
pub type TokenAmount = U256;

/// Percentage in basis points, `0..=10_000`.
pub type BasisPoints = u16;

/// Denominator for basis-point math (10000 bps = 100%).
pub const BASIS_POINTS_DENOM: BasisPoints = 10_000;

/// Error returned when a textual amount cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid token amount '{input}': {reason}")]
pub struct AmountParseError {
    pub input: String,
    pub reason: String,
}

/// Compute `floor(amount * bps / 10000)` without a 512-bit intermediate.
///
/// Splits `amount = q * 10000 + r` so the result is `q * bps + r * bps / 10000`,
/// which equals the truncated full-width product exactly. `bps` above 10000
/// is clamped, so the result never exceeds `amount`.
pub fn mul_bps(amount: TokenAmount, bps: BasisPoints) -> TokenAmount {
    let denom = U256::from(BASIS_POINTS_DENOM);
    let bps = U256::from(bps.min(BASIS_POINTS_DENOM));
    let quotient = amount / denom;
    let remainder = amount % denom;
    quotient * bps + remainder * bps / denom
}

/// Whether a basis-point value lies in `0..=10000`.
#[inline]
pub const fn is_valid_bps(bps: BasisPoints) -> bool {
    bps <= BASIS_POINTS_DENOM
}

/// Parse a base-unit decimal string (underscores allowed as separators).
pub fn parse_amount(input: &str) -> Result<TokenAmount, AmountParseError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(AmountParseError {
            input: input.to_string(),
            reason: "empty".to_string(),
        });
    }
    U256::from_dec_str(&cleaned).map_err(|err| AmountParseError {
        input: input.to_string(),
        reason: format!("{err:?}"),
    })
}
