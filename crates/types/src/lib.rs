//! MYCO Types
//!
//! Primitives shared by the ledger, storage and CLI crates:
//! - account identities (`AccountId`)
//! - 256-bit token amounts and basis-point math
//! - the closed set of access-control roles
//! - token metadata constants

pub mod address;
pub mod amount;
pub mod role;
pub mod token;

pub use address::*;
pub use amount::*;
pub use role::*;
pub use token::*;
