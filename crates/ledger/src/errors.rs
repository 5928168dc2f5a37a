//! Error types for the ledger

use myco_types::{AccountId, Role, TokenAmount};
use thiserror::Error;

/// Reasons a ledger operation is rejected.
///
/// Every variant leaves the ledger untouched: validation completes before
/// any balance, role or parameter is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("account {account} lacks required role {role}")]
    Unauthorized { account: AccountId, role: Role },

    #[error("ledger is paused")]
    Paused,

    #[error("insufficient balance on {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: AccountId,
        available: TokenAmount,
        required: TokenAmount,
    },

    #[error(
        "insufficient allowance for spender {spender} on {owner}: available {available}, required {required}"
    )]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        available: TokenAmount,
        required: TokenAmount,
    },

    #[error("invalid parameter {parameter}: {value} exceeds maximum {max}")]
    InvalidParameter {
        parameter: &'static str,
        value: u32,
        max: u32,
    },

    #[error("minting {amount} would overflow total supply {total_supply}")]
    Overflow {
        total_supply: TokenAmount,
        amount: TokenAmount,
    },

    #[error("ledger is already {}", pause_state(.paused))]
    AlreadyInState { paused: bool },

    #[error("ledger is already initialized")]
    AlreadyInitialized,
}

fn pause_state(paused: &bool) -> &'static str {
    if *paused {
        "paused"
    } else {
        "unpaused"
    }
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
