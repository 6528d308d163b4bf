use alloy_primitives::U256;
use merkle_tree::{Leaf, MerkleTree};

use crate::constant::{ETH_ADDRESS_LEN, LAMPORTS_DECIMALS};
use crate::error::{Result, VampError};
use crate::state::vamp_state::TokenMapping;
use crate::use_proto::vamp_fun::TokenMappingProto;

/// Reduces an intent id to 64 bits by XOR-ing its little-endian 8-byte chunks.
pub fn fold_intent_id(intent_id: &[u8]) -> Result<u64> {
    let mut hash64 = 0u64;
    for chunk in intent_id.chunks(8) {
        let chunk: [u8; 8] = chunk.try_into().map_err(|_| {
            VampError::Decode(format!(
                "intent id of {} bytes is not a whole number of 8-byte chunks",
                intent_id.len()
            ))
        })?;
        hash64 ^= u64::from_le_bytes(chunk);
    }
    Ok(hash64)
}

/// Parses a front-end `toHex` quantity such as `"0xd"`.
///
/// The digits are a number, not ASCII: odd lengths are accepted and
/// `"0x3130"` is 12592, never "10".
pub fn parse_hex_quantity(value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.is_empty() {
        return Err(VampError::Decode(format!("empty hex quantity {value:?}")));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| VampError::Decode(format!("hex quantity {value:?}: {e}")))
}

pub fn parse_eth_address(value: &str) -> Result<[u8; ETH_ADDRESS_LEN]> {
    let bytes = hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| VampError::Decode(format!("eth address {value:?}: {e}")))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| VampError::Decode(format!("eth address must be 20 bytes, got {}", bytes.len())))
}

pub fn format_eth_address(address: &[u8]) -> String {
    format!("0x{}", hex::encode(address))
}

/// Normalizes an 18-decimal source amount into a `u64` with at most 9 decimals.
///
/// Sub-gwei dust is truncated first; after that, every further decimal dropped
/// to make the value fit must be zero.
pub fn convert_to_sol(src_amount: &U256) -> Result<(u64, u8)> {
    let gwei = U256::from(10u64.pow(LAMPORTS_DECIMALS));
    let amount = src_amount
        .checked_div(gwei)
        .ok_or(VampError::ArithmeticOverflow)?;

    let max_extra_decimals = LAMPORTS_DECIMALS as u8;
    for decimals in 0..=max_extra_decimals {
        let scale = U256::from(10u64.pow(decimals as u32));
        let trunc_amount = amount.checked_div(scale).ok_or(VampError::ArithmeticOverflow)?;
        let restored = trunc_amount
            .checked_mul(scale)
            .ok_or(VampError::ArithmeticOverflow)?;
        if restored != amount {
            break;
        }
        if let Ok(val) = u64::try_from(trunc_amount) {
            return Ok((val, max_extra_decimals - decimals));
        }
    }
    Err(VampError::Decode(format!(
        "the amount {src_amount} is too large to be minted"
    )))
}

pub fn convert_token_mapping(
    token_mapping_proto: &TokenMappingProto,
    decimals: u8,
) -> Result<Vec<TokenMapping>> {
    if token_mapping_proto.addresses.len() != token_mapping_proto.amounts.len() {
        return Err(VampError::Decode(format!(
            "token mapping has {} addresses but {} amounts",
            token_mapping_proto.addresses.len(),
            token_mapping_proto.amounts.len()
        )));
    }
    token_mapping_proto
        .addresses
        .iter()
        .zip(&token_mapping_proto.amounts)
        .map(|(address, amount)| {
            let eth_address = address.as_slice().try_into().map_err(|_| {
                VampError::Decode(format!("token mapping address of {} bytes", address.len()))
            })?;
            Ok(TokenMapping {
                eth_address,
                token_amount: *amount,
                decimals,
            })
        })
        .collect()
}

pub fn mapping_leaves(token_mappings: &[TokenMapping]) -> Vec<Leaf> {
    token_mappings
        .iter()
        .map(|mapping| Leaf {
            account: mapping.eth_address,
            amount: mapping.token_amount,
            decimals: mapping.decimals,
        })
        .collect()
}

pub fn compute_merkle_root(token_mappings: &[TokenMapping]) -> [u8; 32] {
    MerkleTree::new(&mapping_leaves(token_mappings)).root
}

pub fn verify_merkle_root(token_mappings: &[TokenMapping], merkle_root: &[u8; 32]) -> bool {
    compute_merkle_root(token_mappings) == *merkle_root
}
