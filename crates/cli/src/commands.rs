use anyhow::{bail, Context, Result};
use myco_ledger::{Token, TransferReceipt};
use myco_storage::LedgerStore;
use myco_types::{AccountId, Role, TokenAmount};
use serde_json::{json, Value};
use tracing::info;

use crate::{Commands, TaxCommands};

/// Run one command against the stored ledger and describe the outcome.
///
/// Mutating commands persist the ledger only when the operation succeeds.
pub(crate) fn execute(store: &dyn LedgerStore, command: Commands) -> Result<Value> {
    let mut token = match (&command, store.load_token()?) {
        (Commands::Init { .. }, stored) => stored.unwrap_or_default(),
        (_, Some(token)) if token.is_initialized() => token,
        _ => bail!("ledger not initialized; run `myco-cli init --deployer <ACCOUNT>`"),
    };

    let (output, mutated) = match command {
        Commands::Init { deployer } => {
            token.initialize(deployer)?;
            info!(%deployer, "ledger created");
            (
                json!({
                    "deployer": deployer,
                    "total_supply": units(token.total_supply()),
                    "roles": token.roles_of(&deployer),
                }),
                true,
            )
        }
        Commands::Mint { caller, to, amount } => {
            token.mint(caller.caller, to, amount)?;
            (
                json!({
                    "minted": units(amount),
                    "to": to,
                    "balance": units(token.balance_of(&to)),
                }),
                true,
            )
        }
        Commands::Transfer { caller, to, amount } => {
            let receipt = token.transfer(caller.caller, to, amount)?;
            (receipt_json(&receipt), true)
        }
        Commands::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => {
            let receipt = token.transfer_from(caller.caller, from, to, amount)?;
            let mut output = receipt_json(&receipt);
            output["allowance"] = json!(units(token.allowance(&from, &caller.caller)));
            (output, true)
        }
        Commands::Approve {
            caller,
            spender,
            amount,
        } => {
            token.approve(caller.caller, spender, amount)?;
            (
                json!({ "owner": caller.caller, "spender": spender, "allowance": units(amount) }),
                true,
            )
        }
        Commands::Balance { account } => (
            json!({ "account": account, "balance": units(token.balance_of(&account)) }),
            false,
        ),
        Commands::Supply => (
            json!({
                "name": token.name(),
                "symbol": token.symbol(),
                "decimals": token.decimals(),
                "total_supply": units(token.total_supply()),
                "paused": token.paused(),
            }),
            false,
        ),
        Commands::Grant(cmd) => {
            let changed = token.grant_role(cmd.caller.caller, cmd.role, cmd.account)?;
            (role_json(&token, cmd.role, cmd.account, changed), changed)
        }
        Commands::Revoke(cmd) => {
            let changed = token.revoke_role(cmd.caller.caller, cmd.role, cmd.account)?;
            (role_json(&token, cmd.role, cmd.account, changed), changed)
        }
        Commands::Renounce { caller, role } => {
            let changed = token.renounce_role(caller.caller, role, caller.caller)?;
            (role_json(&token, role, caller.caller, changed), changed)
        }
        Commands::HasRole { role, account } => (
            json!({ "role": role, "account": account, "has_role": token.has_role(role, &account) }),
            false,
        ),
        Commands::Members { role } => (
            json!({ "role": role, "members": token.role_members(role) }),
            false,
        ),
        Commands::Pause { caller } => {
            token.pause(caller.caller)?;
            (json!({ "paused": true }), true)
        }
        Commands::Unpause { caller } => {
            token.unpause(caller.caller)?;
            (json!({ "paused": false }), true)
        }
        Commands::Tax { action } => tax(&mut token, action)?,
        Commands::Events { since } => (json!(token.events_since(since)), false),
    };

    if mutated {
        store
            .save_token(&token)
            .context("failed to persist ledger state")?;
    }
    Ok(output)
}

fn tax(token: &mut Token, action: TaxCommands) -> Result<(Value, bool)> {
    match action {
        TaxCommands::Set { caller, bps } => token.update_tax(caller.caller, bps)?,
        TaxCommands::FeeShare { caller, bps } => token.update_ccf(caller.caller, bps)?,
        TaxCommands::BurnShare { caller, bps } => token.update_burn(caller.caller, bps)?,
        TaxCommands::Destination { caller, account } => {
            token.update_tax_destination(caller.caller, account)?
        }
        TaxCommands::Enable { caller } => token.enable_tax(caller.caller)?,
        TaxCommands::Disable { caller } => token.disable_tax(caller.caller)?,
        TaxCommands::Show => return Ok((tax_json(token), false)),
    }
    Ok((tax_json(token), true))
}

fn receipt_json(receipt: &TransferReceipt) -> Value {
    json!({
        "from": receipt.from,
        "to": receipt.to,
        "fee_destination": receipt.fee_destination,
        "gross": units(receipt.gross),
        "burned": units(receipt.burned),
        "fee": units(receipt.fee),
        "net": units(receipt.net),
        "taxed": receipt.taxed,
    })
}

/// Decimal base units; JSON numbers cannot hold 256-bit values.
fn units(amount: TokenAmount) -> String {
    amount.to_string()
}

fn role_json(token: &Token, role: Role, account: AccountId, changed: bool) -> Value {
    json!({
        "role": role,
        "account": account,
        "changed": changed,
        "has_role": token.has_role(role, &account),
    })
}

fn tax_json(token: &Token) -> Value {
    json!({
        "enabled": token.taxed(),
        "tax_bps": token.the_tax(),
        "fee_share_bps": token.ccf_tax(),
        "burn_share_bps": token.burn_tax(),
        "destination": token.tax_destination(),
    })
}
