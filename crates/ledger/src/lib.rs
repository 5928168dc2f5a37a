//! MYCO Ledger
//!
//! Fungible-token ledger with role-based administration, a global pause
//! switch and a tax on transfers that burns one share, routes another to a
//! fee destination and delivers the rest.
//!
//! [`Token`] is the single entry point. It owns a [`LedgerState`] and hands
//! each component only the slice of state it needs. [`SharedToken`] wraps it
//! for multi-threaded hosts.

pub mod admin;
pub mod allowances;
pub mod errors;
pub mod events;
pub mod pause;
pub mod roles;
pub mod shared;
pub mod state;
pub mod supply;
pub mod tax;
pub mod token;
pub mod transfer;

pub use allowances::Allowances;
pub use errors::{LedgerError, Result};
pub use events::{EventLog, LedgerEvent, RecordedEvent};
pub use pause::PauseGate;
pub use roles::RoleRegistry;
pub use shared::SharedToken;
pub use state::{LedgerState, StateInvariantError};
pub use supply::SupplyLedger;
pub use tax::{TaxPolicy, TaxSplit};
pub use token::Token;
pub use transfer::TransferReceipt;
