use crate::constant::{CLAIM_SEED, MINT_SEED, SOL_VAULT_SEED, VAMP_SEED, VAULT_SEED};
use crate::error::{Result, VampError};
use crate::pubkey::Pubkey;

fn find(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::find_program_address(seeds, program_id).ok_or(VampError::AddressDerivation)
}

pub fn find_mint_address(
    authority: &Pubkey,
    vamp_identifier: u64,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find(
        &[MINT_SEED, authority.as_ref(), &vamp_identifier.to_le_bytes()],
        program_id,
    )
}

pub fn find_vamp_state_address(mint: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find(&[VAMP_SEED, mint.as_ref()], program_id)
}

pub fn find_vault_address(mint: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find(&[VAULT_SEED, mint.as_ref()], program_id)
}

pub fn find_sol_vault_address(mint: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find(&[SOL_VAULT_SEED, mint.as_ref()], program_id)
}

pub fn find_claim_address(
    vamp_state: &Pubkey,
    eth_address: &[u8; 20],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find(&[CLAIM_SEED, vamp_state.as_ref(), eth_address], program_id)
}

/// Every account a vamp owns, derived from its creator and identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VampAddresses {
    pub mint: Pubkey,
    pub vamp_state: Pubkey,
    pub vamp_state_bump: u8,
    pub vault: Pubkey,
    pub sol_vault: Pubkey,
}

impl VampAddresses {
    pub fn derive(authority: &Pubkey, vamp_identifier: u64, program_id: &Pubkey) -> Result<Self> {
        let (mint, _) = find_mint_address(authority, vamp_identifier, program_id)?;
        Self::for_mint(&mint, program_id)
    }

    pub fn for_mint(mint: &Pubkey, program_id: &Pubkey) -> Result<Self> {
        let (vamp_state, vamp_state_bump) = find_vamp_state_address(mint, program_id)?;
        let (vault, _) = find_vault_address(mint, program_id)?;
        let (sol_vault, _) = find_sol_vault_address(mint, program_id)?;
        Ok(Self {
            mint: *mint,
            vamp_state,
            vamp_state_bump,
            vault,
            sol_vault,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::PROGRAM_ID;

    #[test]
    fn test_mint_address_depends_on_identifier() {
        let authority = Pubkey::new_from_array([3; 32]);
        let (first, _) = find_mint_address(&authority, 1, &PROGRAM_ID).unwrap();
        let (second, _) = find_mint_address(&authority, 2, &PROGRAM_ID).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_vamp_addresses_are_distinct() {
        let authority = Pubkey::new_from_array([3; 32]);
        let addresses = VampAddresses::derive(&authority, 42, &PROGRAM_ID).unwrap();
        let all = [
            addresses.mint,
            addresses.vamp_state,
            addresses.vault,
            addresses.sol_vault,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(
            VampAddresses::for_mint(&addresses.mint, &PROGRAM_ID).unwrap(),
            addresses
        );
    }

    #[test]
    fn test_claim_address_per_source_address() {
        let vamp_state = Pubkey::new_from_array([9; 32]);
        let (a, _) = find_claim_address(&vamp_state, &[1; 20], &PROGRAM_ID).unwrap();
        let (b, _) = find_claim_address(&vamp_state, &[2; 20], &PROGRAM_ID).unwrap();
        assert_ne!(a, b);
    }
}
