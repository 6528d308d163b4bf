use sha3::{Digest, Keccak256};

pub const ADDRESS_LEN: usize = 20;
pub const AMOUNT_LEN: usize = 8;

const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

pub type BalanceHash = [u8; 32];

/// Fixed-width amount encoding used in every digest and merkle leaf.
/// Always little-endian; a producer that writes big-endian bytes signs a
/// different message and every claim it attests is rejected.
pub fn encode_amount(amount: u64) -> [u8; AMOUNT_LEN] {
    amount.to_le_bytes()
}

/// Exact preimage of the balance hash: `address || amount_le || intent_id`.
pub fn balance_message(address: &[u8; ADDRESS_LEN], amount: u64, intent_id: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(ADDRESS_LEN + AMOUNT_LEN + intent_id.len());
    message.extend_from_slice(address);
    message.extend_from_slice(&encode_amount(amount));
    message.extend_from_slice(intent_id);
    message
}

pub fn get_balance_hash(address: &[u8; ADDRESS_LEN], amount: u64, intent_id: &[u8]) -> BalanceHash {
    let mut hasher = Keccak256::new();
    hasher.update(address);
    hasher.update(encode_amount(amount));
    hasher.update(intent_id);
    hasher.finalize().into()
}

/// EIP-191 personal message hash over a 32-byte digest. Wallet-style signers
/// (`sign_message`) sign this, so the verifier must recover against it too.
pub fn to_eth_signed_message_hash(hash: &BalanceHash) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(ETH_SIGNED_MESSAGE_PREFIX);
    hasher.update(hash);
    hasher.finalize().into()
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
