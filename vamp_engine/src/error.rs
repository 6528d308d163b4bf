use thiserror::Error;

use crate::quorum::AttestationRole;

/// Every failure aborts the whole operation; nothing is written on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VampError {
    #[error("Malformed vamping data: {0}")]
    Decode(String),

    #[error("Invalid {role} attestation: {reason}")]
    InvalidAttestation {
        role: AttestationRole,
        reason: String,
    },

    #[error("Requested {requested} tokens but the allocation is {allocated}")]
    AllocationExceeded { requested: u64, allocated: u64 },

    #[error("Invalid Merkle proof")]
    InvalidProof,

    #[error("Claim amount must be greater than zero")]
    InvalidClaimAmount,

    #[error("Unit price {price} exceeds the max price {max_price}")]
    PriceCeilingExceeded { price: u128, max_price: u64 },

    #[error("Claim costs {required} lamports but only {available} are available")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Token vault holds {available} tokens, {requested} requested")]
    VaultDepleted { requested: u64, available: u64 },

    #[error("Tokens already claimed for this address")]
    AlreadyClaimed,

    #[error("Vamp state already initialized")]
    AlreadyInitialized,

    #[error("Vamp state not found")]
    VampNotFound,

    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    #[error("Unable to find a viable program address")]
    AddressDerivation,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, VampError>;

impl From<prost::DecodeError> for VampError {
    fn from(err: prost::DecodeError) -> Self {
        VampError::Decode(err.to_string())
    }
}
