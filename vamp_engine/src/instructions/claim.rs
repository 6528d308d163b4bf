use std::collections::hash_map::Entry;

use balance_util::get_balance_hash;
use merkle_tree::{Hash, Leaf, MerkleTree};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constant::ETH_ADDRESS_LEN;
use crate::error::{Result, VampError};
use crate::event::TokensClaimed;
use crate::instructions::calculate_claim_cost::calculate_claim_cost;
use crate::ledger::LedgerState;
use crate::pubkey::Pubkey;
use crate::quorum::{verify_quorum, Attestation, QuorumKeys, SignatureScheme};
use crate::state::pda::{find_claim_address, VampAddresses};
use crate::state::vamp_state::{ClaimState, TokenMapping, VampState};
use crate::state::AccountData;
use crate::util::format_eth_address;

/// Merkle inclusion proof of `(eth_address, allocation)` at leaf `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationProof {
    pub allocation: u64,
    pub index: usize,
    pub siblings: Vec<Hash>,
}

impl AllocationProof {
    /// Builds the proof for `eth_address` from the full allocation table.
    pub fn from_table(table: &[TokenMapping], eth_address: &[u8; ETH_ADDRESS_LEN]) -> Option<Self> {
        let index = table
            .iter()
            .position(|mapping| mapping.eth_address == *eth_address)?;
        let leaves: Vec<Leaf> = table
            .iter()
            .map(|mapping| Leaf {
                account: mapping.eth_address,
                amount: mapping.token_amount,
                decimals: mapping.decimals,
            })
            .collect();
        let siblings = MerkleTree::new(&leaves).generate_proof(index)?;
        Some(Self {
            allocation: table[index].token_amount,
            index,
            siblings,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClaimArgs {
    pub mint: Pubkey,
    /// Destination account paying the cost and receiving the tokens.
    pub claimant: Pubkey,
    pub eth_address: [u8; ETH_ADDRESS_LEN],
    pub balance: u64,
    pub attestation: Attestation,
    /// Required when the vamp authorizes by merkle root.
    pub proof: Option<AllocationProof>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    pub mint: Pubkey,
    pub claimant: Pubkey,
    pub eth_address: String,
    pub claim_state: Pubkey,
    pub amount: u64,
    pub cost: u64,
    pub total_claimed: u64,
    pub reserve_balance: u64,
    pub token_supply: u64,
}

pub struct Claim<'a> {
    pub program_id: Pubkey,
    pub scheme: &'a dyn SignatureScheme,
    pub ledger: &'a mut LedgerState,
}

/// Verifies, prices and settles one claim.
///
/// Every check and every new balance is computed before the claim marker is
/// inserted; the insert is the commit point and nothing after it can fail.
pub fn buy_claim_tokens(ctx: Claim<'_>, args: &ClaimArgs) -> Result<ClaimReceipt> {
    let ledger = ctx.ledger;
    let addresses = VampAddresses::for_mint(&args.mint, &ctx.program_id)?;
    let vamp_state = ledger
        .accounts
        .get(&addresses.vamp_state)
        .ok_or(VampError::VampNotFound)
        .and_then(|data| VampState::try_from_account_bytes(data))?;

    let digest = get_balance_hash(&args.eth_address, args.balance, &vamp_state.intent_id);
    let keys = QuorumKeys {
        solver: &vamp_state.solver_public_key,
        validator: &vamp_state.validator_public_key,
        owner: vamp_state.owner_key_for(&args.eth_address),
    };
    verify_quorum(ctx.scheme, &digest, &args.attestation, &keys)?;

    if args.balance == 0 {
        return Err(VampError::InvalidClaimAmount);
    }
    let allocated = vamp_state.allocation_for(&args.eth_address, args.proof.as_ref())?;
    if args.balance > allocated {
        return Err(VampError::AllocationExceeded {
            requested: args.balance,
            allocated,
        });
    }

    let cost = calculate_claim_cost(
        vamp_state.token_supply,
        args.balance,
        &vamp_state.pricing_mode()?,
    )?;

    let available = ledger.lamports.get(&args.claimant).copied().unwrap_or(0);
    let claimant_lamports = available
        .checked_sub(cost)
        .ok_or(VampError::InsufficientFunds {
            required: cost,
            available,
        })?;
    let sol_vault_lamports = ledger
        .lamports
        .get(&vamp_state.sol_vault)
        .copied()
        .unwrap_or(0)
        .checked_add(cost)
        .ok_or(VampError::ArithmeticOverflow)?;

    let vault_key = (vamp_state.mint, vamp_state.vault);
    let claimant_key = (vamp_state.mint, args.claimant);
    let vault_tokens = ledger.token_balances.get(&vault_key).copied().unwrap_or(0);
    let remaining_vault_tokens =
        vault_tokens
            .checked_sub(args.balance)
            .ok_or(VampError::VaultDepleted {
                requested: args.balance,
                available: vault_tokens,
            })?;
    let claimant_tokens = ledger
        .token_balances
        .get(&claimant_key)
        .copied()
        .unwrap_or(0)
        .checked_add(args.balance)
        .ok_or(VampError::ArithmeticOverflow)?;

    let mut updated = vamp_state.clone();
    updated.total_claimed = updated
        .total_claimed
        .checked_add(args.balance)
        .ok_or(VampError::ArithmeticOverflow)?;
    updated.reserve_balance = updated
        .reserve_balance
        .checked_add(cost)
        .ok_or(VampError::ArithmeticOverflow)?;
    updated.token_supply = updated
        .token_supply
        .checked_add(args.balance)
        .ok_or(VampError::ArithmeticOverflow)?;
    let vamp_data = updated.to_account_bytes()?;

    let (claim_address, claim_bump) =
        find_claim_address(&addresses.vamp_state, &args.eth_address, &ctx.program_id)?;
    debug!(claim_state = %claim_address, "Derived claim marker address");
    let claim_data = ClaimState {
        is_claimed: true,
        bump: claim_bump,
        eth_address: args.eth_address,
        claimant: args.claimant,
        amount: args.balance,
        cost,
    }
    .to_account_bytes()?;

    match ledger.accounts.entry(claim_address) {
        Entry::Occupied(_) => return Err(VampError::AlreadyClaimed),
        Entry::Vacant(entry) => {
            entry.insert(claim_data);
        }
    }

    ledger.lamports.insert(args.claimant, claimant_lamports);
    ledger.lamports.insert(vamp_state.sol_vault, sol_vault_lamports);
    ledger.token_balances.insert(vault_key, remaining_vault_tokens);
    ledger.token_balances.insert(claimant_key, claimant_tokens);
    ledger.accounts.insert(addresses.vamp_state, vamp_data);

    let eth_address = format_eth_address(&args.eth_address);
    ledger.events.push(
        TokensClaimed {
            mint_account: vamp_state.mint,
            claimant: args.claimant,
            eth_address: eth_address.clone(),
            amount: args.balance,
            cost,
            token_supply: updated.token_supply,
        }
        .into(),
    );

    Ok(ClaimReceipt {
        mint: vamp_state.mint,
        claimant: args.claimant,
        eth_address,
        claim_state: claim_address,
        amount: args.balance,
        cost,
        total_claimed: updated.total_claimed,
        reserve_balance: updated.reserve_balance,
        token_supply: updated.token_supply,
    })
}
