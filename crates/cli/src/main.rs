//! MYCO Ledger Command Line Interface
//!
//! Operates a MYCO token ledger persisted in a local sled database.

mod commands;
mod settings;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use myco_storage::SledLedgerStore;
use myco_types::{parse_amount, AccountId, BasisPoints, Role, TokenAmount};
use std::path::PathBuf;

use crate::settings::{init_logging, AppConfig};

#[derive(Parser)]
#[command(name = "myco-cli")]
#[command(about = "MYCO Token Ledger Command Line Interface", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./myco.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ledger data directory (overrides configuration)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Create the ledger, minting the initial supply to the deployer
    Init {
        /// Deploying account; receives the supply and every role
        #[arg(long)]
        deployer: AccountId,
    },
    /// Mint new tokens (requires MINTER)
    Mint {
        #[command(flatten)]
        caller: CallerArg,
        /// Recipient account
        to: AccountId,
        /// Amount in base units
        #[arg(value_parser = amount_arg)]
        amount: TokenAmount,
    },
    /// Transfer tokens from the caller
    Transfer {
        #[command(flatten)]
        caller: CallerArg,
        /// Recipient account
        to: AccountId,
        /// Amount in base units
        #[arg(value_parser = amount_arg)]
        amount: TokenAmount,
    },
    /// Transfer tokens on behalf of an owner using the caller's allowance
    TransferFrom {
        #[command(flatten)]
        caller: CallerArg,
        /// Owner whose tokens are moved
        from: AccountId,
        /// Recipient account
        to: AccountId,
        /// Amount in base units
        #[arg(value_parser = amount_arg)]
        amount: TokenAmount,
    },
    /// Set the allowance of a spender over the caller's tokens
    Approve {
        #[command(flatten)]
        caller: CallerArg,
        /// Spender account
        spender: AccountId,
        /// Amount in base units
        #[arg(value_parser = amount_arg)]
        amount: TokenAmount,
    },
    /// Show the balance of an account
    Balance {
        /// Account to query
        account: AccountId,
    },
    /// Show token metadata and total supply
    Supply,
    /// Grant a role (requires ADMIN)
    Grant(RoleCommand),
    /// Revoke a role (requires ADMIN)
    Revoke(RoleCommand),
    /// Give up one of the caller's own roles
    Renounce {
        #[command(flatten)]
        caller: CallerArg,
        /// Role to give up
        role: Role,
    },
    /// Check whether an account holds a role
    HasRole {
        role: Role,
        account: AccountId,
    },
    /// List the accounts holding a role
    Members {
        role: Role,
    },
    /// Halt transfers and minting (requires PAUSER)
    Pause {
        #[command(flatten)]
        caller: CallerArg,
    },
    /// Resume transfers and minting (requires PAUSER)
    Unpause {
        #[command(flatten)]
        caller: CallerArg,
    },
    /// Transfer tax administration
    Tax {
        #[command(subcommand)]
        action: TaxCommands,
    },
    /// List journal events
    Events {
        /// First sequence number to include
        #[arg(long, default_value_t = 0)]
        since: u64,
    },
}

#[derive(Debug, Args)]
pub(crate) struct CallerArg {
    /// Account performing the operation
    #[arg(long)]
    caller: AccountId,
}

#[derive(Debug, Args)]
pub(crate) struct RoleCommand {
    #[command(flatten)]
    caller: CallerArg,
    /// Role name (e.g. MINTER or MINTER_ROLE)
    role: Role,
    /// Target account
    account: AccountId,
}

#[derive(Debug, Subcommand)]
pub(crate) enum TaxCommands {
    /// Set the overall tax rate in basis points (requires GOVERNOR)
    Set {
        #[command(flatten)]
        caller: CallerArg,
        bps: BasisPoints,
    },
    /// Set the fee share of the taxed amount in basis points (requires GOVERNOR)
    FeeShare {
        #[command(flatten)]
        caller: CallerArg,
        bps: BasisPoints,
    },
    /// Set the burn share of the taxed amount in basis points (requires GOVERNOR)
    BurnShare {
        #[command(flatten)]
        caller: CallerArg,
        bps: BasisPoints,
    },
    /// Route fees to a new destination (requires GOVERNOR)
    Destination {
        #[command(flatten)]
        caller: CallerArg,
        account: AccountId,
    },
    /// Enable the transfer tax (requires GOVERNOR)
    Enable {
        #[command(flatten)]
        caller: CallerArg,
    },
    /// Disable the transfer tax (requires GOVERNOR)
    Disable {
        #[command(flatten)]
        caller: CallerArg,
    },
    /// Show the current tax parameters
    Show,
}

fn amount_arg(input: &str) -> Result<TokenAmount, String> {
    parse_amount(input).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    init_logging(&config)?;

    let db_path = config.ledger_db_path();
    std::fs::create_dir_all(&db_path)
        .with_context(|| format!("failed to create data directory {}", db_path.display()))?;
    let store = SledLedgerStore::open(&db_path)?;

    let output = commands::execute(&store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
