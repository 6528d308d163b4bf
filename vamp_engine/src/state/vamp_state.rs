use borsh::{BorshDeserialize, BorshSerialize};
use merkle_tree::{verify_merkle_proof, Leaf};
use serde::Serialize;

use super::AccountData;
use crate::constant::{
    ANCHOR_DISCRIMINATOR, CLAIM_STATE_DISCRIMINATOR, ETH_ADDRESS_LEN, VAMP_STATE_DISCRIMINATOR,
};
use crate::error::{Result, VampError};
use crate::instructions::calculate_claim_cost::{BondingCurve, PricingMode};
use crate::instructions::claim::AllocationProof;
use crate::pubkey::Pubkey;

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct TokenMapping {
    pub eth_address: [u8; ETH_ADDRESS_LEN],
    pub token_amount: u64,
    pub decimals: u8,
}

/// Source of truth for what each source address may claim.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Authorization {
    Inline(Vec<TokenMapping>),
    Merkle { root: [u8; 32] },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: u8,
    pub erc20_address: Vec<u8>,
}

/// Fields up to `sol_vault` keep the offsets external tooling reads.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VampState {
    pub bump: u8,
    pub mint: Pubkey,
    pub solver_public_key: Vec<u8>,
    pub validator_public_key: Vec<u8>,
    pub vamp_identifier: u64,
    pub intent_id: Vec<u8>,
    // Bonding curve accounting
    pub total_claimed: u64,   // Cumulative tokens claimed
    pub reserve_balance: u64, // Cumulative lamports paid into the SOL vault
    pub token_supply: u64,    // Circulating supply the curve is priced against
    pub curve_exponent: u64,
    pub initial_price: u64, // Price of the first unit in lamports
    pub sol_vault: Pubkey,
    pub curve_slope: u64,
    pub base_price: u64,
    pub max_price: Option<u64>,
    pub paid_claiming_enabled: bool,
    pub use_bonding_curve: bool,
    pub flat_price_per_token: u64,
    pub authority: Pubkey,
    /// Empty means the claimed source address signs as owner.
    pub owner_public_key: Vec<u8>,
    pub vault: Pubkey,
    pub minted_supply: u64,
    pub metadata: TokenMetadata,
    pub authorization: Authorization,
}

impl AccountData for VampState {
    const DISCRIMINATOR: [u8; ANCHOR_DISCRIMINATOR] = VAMP_STATE_DISCRIMINATOR;
}

impl VampState {
    pub fn pricing_mode(&self) -> Result<PricingMode> {
        if !self.paid_claiming_enabled {
            return Ok(PricingMode::Free);
        }
        if !self.use_bonding_curve {
            return Ok(PricingMode::FixedPrice {
                flat_price_per_token: self.flat_price_per_token,
                max_price: self.max_price,
            });
        }
        let curve_exponent = u32::try_from(self.curve_exponent)
            .map_err(|_| VampError::InvalidAccountData("curve exponent out of range".to_string()))?;
        Ok(PricingMode::BondingCurve(BondingCurve {
            base_price: self.base_price,
            curve_slope: self.curve_slope,
            curve_exponent,
            max_price: self.max_price,
        }))
    }

    pub fn owner_key_for<'a>(&'a self, eth_address: &'a [u8; ETH_ADDRESS_LEN]) -> &'a [u8] {
        if self.owner_public_key.is_empty() {
            eth_address
        } else {
            &self.owner_public_key
        }
    }

    /// Total amount `eth_address` may claim. Unknown addresses are allocated zero.
    pub fn allocation_for(
        &self,
        eth_address: &[u8; ETH_ADDRESS_LEN],
        proof: Option<&AllocationProof>,
    ) -> Result<u64> {
        match &self.authorization {
            Authorization::Inline(mappings) => Ok(mappings
                .iter()
                .find(|mapping| mapping.eth_address == *eth_address)
                .map(|mapping| mapping.token_amount)
                .unwrap_or(0)),
            Authorization::Merkle { root } => {
                let proof = proof.ok_or(VampError::InvalidProof)?;
                let leaf = Leaf {
                    account: *eth_address,
                    amount: proof.allocation,
                    decimals: self.metadata.decimals,
                };
                if verify_merkle_proof(leaf.hash(), &proof.siblings, *root, proof.index) {
                    Ok(proof.allocation)
                } else {
                    Err(VampError::InvalidProof)
                }
            }
        }
    }
}

/// Marker whose existence means the source address has claimed.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct ClaimState {
    pub is_claimed: bool,
    pub bump: u8,
    pub eth_address: [u8; ETH_ADDRESS_LEN],
    pub claimant: Pubkey,
    pub amount: u64,
    pub cost: u64,
}

impl AccountData for ClaimState {
    const DISCRIMINATOR: [u8; ANCHOR_DISCRIMINATOR] = CLAIM_STATE_DISCRIMINATOR;
}

/// Fixed-offset prefix of a VampState account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VampStateHeader {
    pub bump: u8,
    pub mint: Pubkey,
    pub solver_public_key: String,
    pub validator_public_key: String,
    pub vamp_identifier: u64,
    pub intent_id: String,
    pub total_claimed: u64,
    pub reserve_balance: u64,
    pub token_supply: u64,
    pub curve_exponent: u64,
    pub initial_price: u64,
    pub sol_vault: Pubkey,
}

struct AccountReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> AccountReader<'a> {
    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                VampError::InvalidAccountData(format!("{field} at offset {} is truncated", self.offset))
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn u64(&mut self, field: &str) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, field)?);
        Ok(u64::from_le_bytes(buf))
    }

    fn pubkey(&mut self, field: &str) -> Result<Pubkey> {
        let mut buf = [0u8; 32];
        buf.copy_from_slice(self.take(32, field)?);
        Ok(Pubkey::new_from_array(buf))
    }

    fn bytes(&mut self, field: &str) -> Result<&'a [u8]> {
        let mut len = [0u8; 4];
        len.copy_from_slice(self.take(4, field)?);
        self.take(u32::from_le_bytes(len) as usize, field)
    }
}

impl VampStateHeader {
    /// Reads the prefix field by field; works on accounts whose trailing layout is unknown.
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut reader = AccountReader { data, offset: 0 };
        if reader.take(ANCHOR_DISCRIMINATOR, "discriminator")? != VAMP_STATE_DISCRIMINATOR {
            return Err(VampError::InvalidAccountData(
                "discriminator mismatch".to_string(),
            ));
        }
        Ok(Self {
            bump: reader.take(1, "bump")?[0],
            mint: reader.pubkey("mint")?,
            solver_public_key: hex::encode(reader.bytes("solver_public_key")?),
            validator_public_key: hex::encode(reader.bytes("validator_public_key")?),
            vamp_identifier: reader.u64("vamp_identifier")?,
            intent_id: hex::encode(reader.bytes("intent_id")?),
            total_claimed: reader.u64("total_claimed")?,
            reserve_balance: reader.u64("reserve_balance")?,
            token_supply: reader.u64("token_supply")?,
            curve_exponent: reader.u64("curve_exponent")?,
            initial_price: reader.u64("initial_price")?,
            sol_vault: reader.pubkey("sol_vault")?,
        })
    }
}
