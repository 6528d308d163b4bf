use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use vamp_engine::constant::CLAIM_STATE_DISCRIMINATOR;
use vamp_engine::util::{compute_merkle_root, fold_intent_id, format_eth_address};
use vamp_engine::{
    AccountData, Authorization, AuthorizationSettings, ClaimState, TokenMappingSet, VampState,
    VampStateHeader, VampingParams,
};

/// Reads a file holding either raw bytes or (optionally `0x`-prefixed) hex text.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if let Ok(text) = std::str::from_utf8(&raw) {
        let digits = text.trim().trim_start_matches("0x");
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            debug!(path = %path.display(), "Reading hex-encoded input");
            return hex::decode(digits).with_context(|| format!("Invalid hex in {}", path.display()));
        }
    }
    Ok(raw)
}

#[derive(Debug, Serialize)]
#[serde(tag = "account")]
pub enum AccountReport {
    VampState {
        #[serde(flatten)]
        header: VampStateHeader,
        /// Present when the trailing fields decode as well.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<VampStateDetails>,
    },
    ClaimState(ClaimState),
}

#[derive(Debug, Serialize)]
pub struct VampStateDetails {
    pub authority: String,
    pub vault: String,
    pub minted_supply: u64,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimals: u8,
    pub authorization: String,
    pub pricing: VampingParams,
}

impl From<&VampState> for VampStateDetails {
    fn from(state: &VampState) -> Self {
        Self {
            authority: state.authority.to_string(),
            vault: state.vault.to_string(),
            minted_supply: state.minted_supply,
            token_name: state.metadata.name.clone(),
            token_symbol: state.metadata.symbol.clone(),
            token_decimals: state.metadata.decimals,
            authorization: describe_authorization(&state.authorization),
            pricing: VampingParams {
                paid_claiming_enabled: state.paid_claiming_enabled,
                use_bonding_curve: state.use_bonding_curve,
                curve_slope: state.curve_slope,
                base_price: state.base_price,
                max_price: state.max_price,
                flat_price_per_token: state.flat_price_per_token,
                curve_exponent: state.curve_exponent as u32,
            },
        }
    }
}

fn describe_authorization(authorization: &Authorization) -> String {
    match authorization {
        Authorization::Inline(entries) => format!("inline ({} entries)", entries.len()),
        Authorization::Merkle { root } => format!("merkle (root 0x{})", hex::encode(root)),
    }
}

pub fn inspect_account(data: &[u8]) -> Result<AccountReport> {
    if data.starts_with(&CLAIM_STATE_DISCRIMINATOR) {
        return Ok(AccountReport::ClaimState(ClaimState::try_from_account_bytes(data)?));
    }
    let header = VampStateHeader::read(data)?;
    let details = match VampState::try_from_account_bytes(data) {
        Ok(state) => Some(VampStateDetails::from(&state)),
        Err(err) => {
            info!(error = %err, "Only the fixed-offset prefix could be parsed");
            None
        }
    };
    Ok(AccountReport::VampState { header, details })
}

#[derive(Debug, Serialize)]
pub struct DescriptorReport {
    pub intent_id: String,
    /// Vamp identifier used when none is given at initialization.
    pub default_vamp_identifier: Option<u64>,
    pub token_name: String,
    pub token_symbol: String,
    pub token_uri: Option<String>,
    pub token_erc20_address: String,
    pub amount: u64,
    pub decimals: u8,
    pub chain_id: u64,
    pub solver_public_key: String,
    pub validator_public_key: String,
    pub owner_public_key: Option<String>,
    pub authorization: String,
    /// Entries stored in state; zero under merkle authorization.
    pub inline_entries: usize,
    pub merkle_root: String,
    pub vamping_params: Option<VampingParams>,
}

pub fn describe_descriptor(blob: &[u8], settings: &AuthorizationSettings) -> Result<DescriptorReport> {
    let set = TokenMappingSet::decode_with(blob, settings)?;
    let merkle_root = match &set.authorization {
        Authorization::Inline(entries) => compute_merkle_root(entries),
        Authorization::Merkle { root } => *root,
    };
    Ok(DescriptorReport {
        intent_id: hex::encode(&set.intent_id),
        default_vamp_identifier: fold_intent_id(&set.intent_id).ok(),
        token_name: set.token_name.clone(),
        token_symbol: set.token_symbol.clone(),
        token_uri: set.token_uri.clone(),
        token_erc20_address: format_eth_address(&set.token_erc20_address),
        amount: set.amount,
        decimals: set.decimals,
        chain_id: set.chain_id,
        solver_public_key: format_eth_address(&set.solver_public_key),
        validator_public_key: format_eth_address(&set.validator_public_key),
        owner_public_key: (!set.owner_public_key.is_empty())
            .then(|| format_eth_address(&set.owner_public_key)),
        authorization: describe_authorization(&set.authorization),
        inline_entries: set.entries().len(),
        merkle_root: format!("0x{}", hex::encode(merkle_root)),
        vamping_params: set.vamping_params,
    })
}

pub fn load_account(path: &Path) -> Result<AccountReport> {
    let data = read_bytes(path)?;
    inspect_account(&data).map_err(|e| anyhow!("{}: {e}", path.display()))
}
