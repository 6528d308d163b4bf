use std::path::Path;

use alloy_primitives::U256;
use anyhow::{anyhow, Context, Result};
use balance_util::{balance_message, get_balance_hash, to_eth_signed_message_hash};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vamp_engine::util::{convert_to_sol, parse_eth_address};
use vamp_engine::{load_config, quote_claim, AttestationSigner, EngineConfig};

use crate::args::{Args, BalanceArgs, Command};
use crate::inspect::{describe_descriptor, load_account, read_bytes};
use crate::simulate::{load_claim_entries, Simulation};

mod args;
mod inspect;
mod simulate;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(EngineConfig::default()),
    }
}

fn parse_balance(balance: &BalanceArgs) -> Result<([u8; 20], Vec<u8>)> {
    let eth_address = parse_eth_address(&balance.eth_address)?;
    let intent_id = hex::decode(balance.intent_id.trim_start_matches("0x"))
        .context("Invalid intent id")?;
    Ok((eth_address, intent_id))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_engine_config(args.config.as_deref())?;

    match args.command {
        Command::Digest(balance) => {
            let (eth_address, intent_id) = parse_balance(&balance)?;
            let digest = get_balance_hash(&eth_address, balance.amount, &intent_id);
            print_json(&json!({
                "message": hex::encode(balance_message(&eth_address, balance.amount, &intent_id)),
                "digest": format!("0x{}", hex::encode(digest)),
                "eth_signed_message_hash": format!("0x{}", hex::encode(to_eth_signed_message_hash(&digest))),
            }))?;
        }
        Command::Sign {
            balance,
            private_key,
        } => {
            let (eth_address, intent_id) = parse_balance(&balance)?;
            let signer = AttestationSigner::from_hex(&private_key)?;
            info!(signer = %format!("0x{}", hex::encode(signer.address())), "Signing balance digest");
            let signature = signer.attest_balance(&eth_address, balance.amount, &intent_id);
            print_json(&json!({
                "signer": format!("0x{}", hex::encode(signer.address())),
                "signature": format!("0x{}", hex::encode(signature)),
            }))?;
        }
        Command::Quote {
            supply,
            amount,
            pricing,
        } => {
            let params = pricing.apply(config.pricing);
            params.validate()?;
            print_json(&quote_claim(supply, amount, &params.pricing_mode())?)?;
        }
        Command::Convert { amount } => {
            let src_amount: U256 = amount
                .parse()
                .map_err(|e| anyhow!("Invalid source amount {amount:?}: {e}"))?;
            let (amount, decimals) = convert_to_sol(&src_amount)?;
            print_json(&json!({ "amount": amount, "decimals": decimals }))?;
        }
        Command::Descriptor { file } => {
            let blob = read_bytes(&file)?;
            print_json(&describe_descriptor(&blob, &config.authorization)?)?;
        }
        Command::Inspect { file } => {
            print_json(&load_account(&file)?)?;
        }
        Command::Simulate {
            descriptor,
            claims,
            authority,
            vamp_identifier,
            pricing,
        } => {
            let vamping_data = read_bytes(&descriptor)?;
            let entries = load_claim_entries(&claims)?;
            let simulation = Simulation {
                authority,
                vamp_identifier,
                vamping_params: (!pricing.is_empty()).then(|| pricing.apply(config.pricing)),
            };
            let report = simulation.run(&config, vamping_data, &entries).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}
