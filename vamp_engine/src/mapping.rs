use std::collections::HashSet;

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::constant::{
    DEFAULT_MAX_INLINE_ENTRIES, ETH_ADDRESS_LEN, MAX_INTENT_ID_LEN, MAX_TOKEN_DECIMALS,
    MAX_TOKEN_NAME_LEN, MAX_TOKEN_SYMBOL_LEN, MAX_TOKEN_URI_LEN, MERKLE_ROOT_LEN,
};
use crate::error::{Result, VampError};
use crate::instructions::initialize::VampingParams;
use crate::state::vamp_state::{Authorization, TokenMapping};
use crate::use_proto::vamp_fun::{TokenMappingProto, TokenVampingInfoProto};
use crate::util::{compute_merkle_root, convert_token_mapping, verify_merkle_root};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationMode {
    /// Merkle when the descriptor carries only a root or the table is over the inline limit.
    #[default]
    Auto,
    Inline,
    Merkle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationSettings {
    pub mode: AuthorizationMode,
    pub max_inline_entries: usize,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            mode: AuthorizationMode::Auto,
            max_inline_entries: DEFAULT_MAX_INLINE_ENTRIES,
        }
    }
}

/// Decoded and validated vamping descriptor.
///
/// Inline entries carry the set's `decimals`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMappingSet {
    pub intent_id: Vec<u8>,
    pub token_name: String,
    pub token_symbol: String,
    pub token_uri: Option<String>,
    pub token_erc20_address: Vec<u8>,
    /// Initial supply minted into the token vault.
    pub amount: u64,
    pub decimals: u8,
    pub chain_id: u64,
    pub salt: u64,
    pub solver_public_key: Vec<u8>,
    pub validator_public_key: Vec<u8>,
    pub owner_public_key: Vec<u8>,
    pub authorization: Authorization,
    pub vamping_params: Option<VampingParams>,
}

fn check_len(field: &str, len: usize, allowed: impl Fn(usize) -> bool) -> Result<()> {
    if allowed(len) {
        Ok(())
    } else {
        Err(VampError::Decode(format!("{field} has invalid length {len}")))
    }
}

impl TokenMappingSet {
    pub fn decode(blob: &[u8]) -> Result<Self> {
        Self::decode_with(blob, &AuthorizationSettings::default())
    }

    pub fn decode_with(blob: &[u8], settings: &AuthorizationSettings) -> Result<Self> {
        let info = TokenVampingInfoProto::decode(blob)?;

        check_len("intent_id", info.intent_id.len(), |l| {
            (1..=MAX_INTENT_ID_LEN).contains(&l)
        })?;
        check_len("token_name", info.token_name.len(), |l| l <= MAX_TOKEN_NAME_LEN)?;
        check_len("token_symbol", info.token_symbol.len(), |l| {
            l <= MAX_TOKEN_SYMBOL_LEN
        })?;
        if let Some(uri) = &info.token_uri {
            check_len("token_uri", uri.len(), |l| l <= MAX_TOKEN_URI_LEN)?;
        }
        check_len("token_erc20_address", info.token_erc20_address.len(), |l| {
            l == 0 || l == ETH_ADDRESS_LEN
        })?;
        check_len("solver_public_key", info.solver_public_key.len(), |l| {
            l == ETH_ADDRESS_LEN
        })?;
        check_len("validator_public_key", info.validator_public_key.len(), |l| {
            l == ETH_ADDRESS_LEN
        })?;
        check_len("owner_public_key", info.owner_public_key.len(), |l| {
            l == 0 || l == ETH_ADDRESS_LEN
        })?;
        check_len("merkle_root", info.merkle_root.len(), |l| {
            l == 0 || l == MERKLE_ROOT_LEN
        })?;

        let decimals = u8::try_from(info.decimal)
            .ok()
            .filter(|d| *d <= MAX_TOKEN_DECIMALS)
            .ok_or_else(|| VampError::Decode(format!("unsupported decimals {}", info.decimal)))?;

        let entries = convert_token_mapping(&info.token_mapping.unwrap_or_default(), decimals)?;
        let mut seen = HashSet::with_capacity(entries.len());
        let mut allocated: u64 = 0;
        for entry in &entries {
            if !seen.insert(entry.eth_address) {
                return Err(VampError::Decode(format!(
                    "duplicate address 0x{} in token mapping",
                    hex::encode(entry.eth_address)
                )));
            }
            allocated = allocated
                .checked_add(entry.token_amount)
                .ok_or(VampError::ArithmeticOverflow)?;
        }
        if allocated > info.amount {
            return Err(VampError::Decode(format!(
                "token mapping allocates {allocated} but only {} are minted",
                info.amount
            )));
        }

        let root: Option<[u8; 32]> = if info.merkle_root.is_empty() {
            None
        } else {
            let mut root = [0u8; 32];
            root.copy_from_slice(&info.merkle_root);
            Some(root)
        };
        if let Some(root) = &root {
            if !entries.is_empty() && !verify_merkle_root(&entries, root) {
                return Err(VampError::Decode(
                    "merkle root does not match token mapping".to_string(),
                ));
            }
        }

        let authorization = select_authorization(entries, root, settings)?;

        let vamping_params = info.vamping_params.map(VampingParams::from);
        if let Some(params) = &vamping_params {
            params.validate()?;
        }

        Ok(Self {
            intent_id: info.intent_id,
            token_name: info.token_name,
            token_symbol: info.token_symbol,
            token_uri: info.token_uri,
            token_erc20_address: info.token_erc20_address,
            amount: info.amount,
            decimals,
            chain_id: info.chain_id,
            salt: info.salt,
            solver_public_key: info.solver_public_key,
            validator_public_key: info.validator_public_key,
            owner_public_key: info.owner_public_key,
            authorization,
            vamping_params,
        })
    }

    /// Inline sets are written as a table, merkle sets as a root only.
    pub fn encode(&self) -> Vec<u8> {
        let (token_mapping, merkle_root) = match &self.authorization {
            Authorization::Inline(entries) => (
                Some(TokenMappingProto {
                    addresses: entries.iter().map(|e| e.eth_address.to_vec()).collect(),
                    amounts: entries.iter().map(|e| e.token_amount).collect(),
                }),
                Vec::new(),
            ),
            Authorization::Merkle { root } => (None, root.to_vec()),
        };
        TokenVampingInfoProto {
            intent_id: self.intent_id.clone(),
            token_name: self.token_name.clone(),
            token_symbol: self.token_symbol.clone(),
            token_erc20_address: self.token_erc20_address.clone(),
            token_uri: self.token_uri.clone(),
            amount: self.amount,
            decimal: self.decimals as u32,
            token_mapping,
            chain_id: self.chain_id,
            salt: self.salt,
            solver_public_key: self.solver_public_key.clone(),
            validator_public_key: self.validator_public_key.clone(),
            merkle_root,
            vamping_params: self.vamping_params.map(Into::into),
            owner_public_key: self.owner_public_key.clone(),
        }
        .encode_to_vec()
    }

    /// Inline allocation table; empty for merkle sets.
    pub fn entries(&self) -> &[TokenMapping] {
        match &self.authorization {
            Authorization::Inline(entries) => entries,
            Authorization::Merkle { .. } => &[],
        }
    }
}

fn select_authorization(
    entries: Vec<TokenMapping>,
    root: Option<[u8; 32]>,
    settings: &AuthorizationSettings,
) -> Result<Authorization> {
    match settings.mode {
        AuthorizationMode::Auto => {
            if entries.is_empty() {
                Ok(match root {
                    Some(root) => Authorization::Merkle { root },
                    None => Authorization::Inline(entries),
                })
            } else if entries.len() > settings.max_inline_entries {
                let root = root.unwrap_or_else(|| compute_merkle_root(&entries));
                Ok(Authorization::Merkle { root })
            } else {
                Ok(Authorization::Inline(entries))
            }
        }
        AuthorizationMode::Inline => {
            if entries.is_empty() && root.is_some() {
                return Err(VampError::Decode(
                    "inline authorization needs a token mapping table".to_string(),
                ));
            }
            if entries.len() > settings.max_inline_entries {
                return Err(VampError::Decode(format!(
                    "{} token mapping entries exceed the inline limit of {}",
                    entries.len(),
                    settings.max_inline_entries
                )));
            }
            Ok(Authorization::Inline(entries))
        }
        AuthorizationMode::Merkle => match root {
            Some(root) => Ok(Authorization::Merkle { root }),
            None if !entries.is_empty() => Ok(Authorization::Merkle {
                root: compute_merkle_root(&entries),
            }),
            None => Err(VampError::Decode(
                "merkle authorization needs a root or a token mapping table".to_string(),
            )),
        },
    }
}
