//! Claim verification and bonding-curve pricing for vamp.fun token migrations.
//!
//! A vamp is initialized from a serialized descriptor of source-chain
//! allocations. Holders then redeem their allocation with three attestations
//! (solver, validator, owner) over one canonical balance digest, paying the
//! price set by the vamp's curve.

pub mod config;
pub mod constant;
pub mod error;
pub mod event;
pub mod instructions;
pub mod ledger;
pub mod mapping;
pub mod pubkey;
pub mod quorum;
pub mod state;
pub mod use_proto;
pub mod util;

pub use config::{load_config, EngineConfig};
pub use error::{Result, VampError};
pub use event::{TokenMintCreated, TokensClaimed, VampEvent};
pub use instructions::calculate_claim_cost::{
    calculate_claim_cost, quote_claim, BondingCurve, ClaimQuote, PricingMode,
};
pub use instructions::claim::{AllocationProof, ClaimArgs, ClaimReceipt};
pub use instructions::initialize::{InitializeArgs, VampingParams};
pub use ledger::VampLedger;
pub use mapping::{AuthorizationMode, AuthorizationSettings, TokenMappingSet};
pub use pubkey::Pubkey;
pub use quorum::{
    verify_quorum, Attestation, AttestationRole, AttestationSigner, EthereumPersonalSign,
    QuorumKeys, SignatureScheme,
};
pub use state::vamp_state::{
    Authorization, ClaimState, TokenMapping, TokenMetadata, VampState, VampStateHeader,
};
pub use state::AccountData;
