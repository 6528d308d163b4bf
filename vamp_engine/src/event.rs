use serde::Serialize;

use crate::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMintCreated {
    pub mint_account: Pubkey,
    pub vamp_state: Pubkey,
    pub token_name: String,
    pub token_symbol: String,
    /// `0x`-prefixed hex of the source ERC20 contract.
    pub token_erc20_address: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokensClaimed {
    pub mint_account: Pubkey,
    pub claimant: Pubkey,
    pub eth_address: String,
    pub amount: u64,
    pub cost: u64,
    /// Circulating supply after the claim.
    pub token_supply: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum VampEvent {
    TokenMintCreated(TokenMintCreated),
    TokensClaimed(TokensClaimed),
}

impl From<TokenMintCreated> for VampEvent {
    fn from(event: TokenMintCreated) -> Self {
        VampEvent::TokenMintCreated(event)
    }
}

impl From<TokensClaimed> for VampEvent {
    fn from(event: TokensClaimed) -> Self {
        VampEvent::TokensClaimed(event)
    }
}
