use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing an account identifier string.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("account id must start with '0x'")]
    InvalidPrefix,
    #[error("account id must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("account id payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("account id payload must be exactly 32 bytes")]
    InvalidPayloadLength,
}

/// Number of raw bytes contained in an account identifier.
pub const ACCOUNT_ID_BYTES: usize = 32;
/// Expected string length of an encoded account id (`0x` + 64 hex chars).
pub const ACCOUNT_ID_STRING_LENGTH: usize = 2 + ACCOUNT_ID_BYTES * 2;

/// Encode raw account bytes into the `0x`-prefixed hexadecimal form.
pub fn encode_account_id(bytes: &[u8; ACCOUNT_ID_BYTES]) -> String {
    let mut encoded = String::with_capacity(ACCOUNT_ID_STRING_LENGTH);
    encoded.push_str("0x");
    encoded.push_str(&hex::encode(bytes));
    encoded
}

/// Decode a `0x`-prefixed hexadecimal account id into raw bytes.
pub fn decode_account_id(value: &str) -> Result<[u8; ACCOUNT_ID_BYTES], AddressError> {
    let payload = value
        .strip_prefix("0x")
        .ok_or(AddressError::InvalidPrefix)?;

    if value.len() != ACCOUNT_ID_STRING_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: ACCOUNT_ID_STRING_LENGTH,
            actual: value.len(),
        });
    }

    let decoded = hex::decode(payload)?;
    decoded
        .try_into()
        .map_err(|_| AddressError::InvalidPayloadLength)
}

/// Opaque identity of a ledger participant.
///
/// Only equality carries meaning. The `Ord`/`Hash` derives exist so ids can
/// key maps and produce deterministic snapshots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(pub [u8; ACCOUNT_ID_BYTES]);

impl AccountId {
    pub const fn new(bytes: [u8; ACCOUNT_ID_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_BYTES] {
        &self.0
    }
}

impl From<[u8; ACCOUNT_ID_BYTES]> for AccountId {
    fn from(value: [u8; ACCOUNT_ID_BYTES]) -> Self {
        AccountId(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        encode_account_id(value.as_bytes())
    }
}

impl TryFrom<String> for AccountId {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for AccountId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_account_id(s).map(AccountId)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_account_id(self.as_bytes()))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefixed_hex() {
        let id = AccountId::new([0xAB; ACCOUNT_ID_BYTES]);
        let encoded = id.to_string();
        assert!(encoded.starts_with("0x"));
        assert_eq!(encoded.len(), ACCOUNT_ID_STRING_LENGTH);
        assert_eq!(encoded.parse::<AccountId>().unwrap(), id);
        assert_eq!(encoded, encode_account_id(id.as_bytes()));
    }

    #[test]
    fn invalid_prefix_rejected() {
        let bad = "1x".to_string() + &"00".repeat(ACCOUNT_ID_BYTES);
        let err = bad.parse::<AccountId>().unwrap_err();
        assert!(matches!(err, AddressError::InvalidPrefix));
    }

    #[test]
    fn invalid_length_rejected() {
        let bad = "0x".to_string() + &"00".repeat(ACCOUNT_ID_BYTES - 1);
        let err = bad.parse::<AccountId>().unwrap_err();
        assert!(matches!(err, AddressError::InvalidLength { .. }));
    }

    #[test]
    fn invalid_hex_rejected() {
        let bad = format!("0x{}", "gg".repeat(ACCOUNT_ID_BYTES));
        let err = bad.parse::<AccountId>().unwrap_err();
        assert!(matches!(err, AddressError::InvalidHex(_)));
    }

    #[test]
    fn serializes_as_string() {
        let id = AccountId::new([7u8; ACCOUNT_ID_BYTES]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
