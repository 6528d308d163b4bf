use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use vamp_engine::util::parse_hex_quantity;
use vamp_engine::{Pubkey, VampingParams};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Engine configuration (TOML). Defaults apply when omitted.
    #[arg(long, env = "VAMP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the canonical balance digest and its EIP-191 wrapping
    Digest(BalanceArgs),

    /// Sign the balance digest as the solver, validator or token owner
    Sign {
        #[command(flatten)]
        balance: BalanceArgs,

        #[arg(long, env = "ETHEREUM_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },

    /// Price a claim against a given circulating supply
    Quote {
        #[arg(long, value_parser = parse_quantity)]
        supply: u64,

        #[arg(long, value_parser = parse_quantity)]
        amount: u64,

        #[command(flatten)]
        pricing: PricingArgs,
    },

    /// Normalize an 18-decimal source amount to at most 9 decimals
    Convert {
        /// Decimal source-chain amount
        amount: String,
    },

    /// Decode a vamping descriptor (raw protobuf or hex)
    Descriptor {
        #[arg(long)]
        file: PathBuf,
    },

    /// Parse a raw VampState or ClaimState account (raw bytes or hex)
    Inspect {
        #[arg(long)]
        file: PathBuf,
    },

    /// Initialize a vamp in memory and replay published claim entries against it
    Simulate {
        #[arg(long, help = "Path to the vamping descriptor")]
        descriptor: PathBuf,

        #[arg(long, help = "Path to a JSON array of claim entries")]
        claims: PathBuf,

        #[arg(long, env = "VAMP_AUTHORITY")]
        authority: Pubkey,

        #[arg(long)]
        vamp_identifier: Option<u64>,

        #[command(flatten)]
        pricing: PricingArgs,
    },
}

#[derive(ClapArgs, Debug)]
pub struct BalanceArgs {
    #[arg(long)]
    pub eth_address: String,

    #[arg(long, value_parser = parse_quantity)]
    pub amount: u64,

    /// Hex intent id
    #[arg(long)]
    pub intent_id: String,
}

/// Overrides for the configured vamping parameters. Quantities accept decimal
/// or `0x` hex, as sent by the front end.
#[derive(ClapArgs, Debug, Default)]
pub struct PricingArgs {
    #[arg(long, num_args(0..=1), default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub paid_claiming_enabled: Option<bool>,

    #[arg(long, num_args(0..=1), default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub use_bonding_curve: Option<bool>,

    #[arg(long, value_parser = parse_quantity)]
    pub curve_slope: Option<u64>,

    #[arg(long, value_parser = parse_quantity)]
    pub base_price: Option<u64>,

    #[arg(long, value_parser = parse_quantity)]
    pub max_price: Option<u64>,

    #[arg(long, value_parser = parse_quantity)]
    pub flat_price_per_token: Option<u64>,

    #[arg(long)]
    pub curve_exponent: Option<u32>,
}

impl PricingArgs {
    pub fn is_empty(&self) -> bool {
        self.paid_claiming_enabled.is_none()
            && self.use_bonding_curve.is_none()
            && self.curve_slope.is_none()
            && self.base_price.is_none()
            && self.max_price.is_none()
            && self.flat_price_per_token.is_none()
            && self.curve_exponent.is_none()
    }

    pub fn apply(&self, base: VampingParams) -> VampingParams {
        VampingParams {
            paid_claiming_enabled: self
                .paid_claiming_enabled
                .unwrap_or(base.paid_claiming_enabled),
            use_bonding_curve: self.use_bonding_curve.unwrap_or(base.use_bonding_curve),
            curve_slope: self.curve_slope.unwrap_or(base.curve_slope),
            base_price: self.base_price.unwrap_or(base.base_price),
            max_price: self.max_price.or(base.max_price),
            flat_price_per_token: self.flat_price_per_token.unwrap_or(base.flat_price_per_token),
            curve_exponent: self.curve_exponent.unwrap_or(base.curve_exponent),
        }
    }
}

fn parse_quantity(value: &str) -> Result<u64, String> {
    if value.starts_with("0x") || value.starts_with("0X") {
        parse_hex_quantity(value).map_err(|e| e.to_string())
    } else {
        value.parse::<u64>().map_err(|e| e.to_string())
    }
}
