pub mod pda;
pub mod vamp_state;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::constant::ANCHOR_DISCRIMINATOR;
use crate::error::{Result, VampError};

/// Borsh record prefixed by an 8-byte type discriminator.
pub trait AccountData: BorshSerialize + BorshDeserialize + Sized {
    const DISCRIMINATOR: [u8; ANCHOR_DISCRIMINATOR];

    fn to_account_bytes(&self) -> Result<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)
            .map_err(|e| VampError::InvalidAccountData(e.to_string()))?;
        Ok(data)
    }

    /// Trailing bytes after the record (account padding) are ignored.
    fn try_from_account_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ANCHOR_DISCRIMINATOR {
            return Err(VampError::InvalidAccountData(format!(
                "account of {} bytes has no discriminator",
                data.len()
            )));
        }
        let (discriminator, mut body) = data.split_at(ANCHOR_DISCRIMINATOR);
        if discriminator != Self::DISCRIMINATOR {
            return Err(VampError::InvalidAccountData(
                "discriminator mismatch".to_string(),
            ));
        }
        Self::deserialize(&mut body).map_err(|e| VampError::InvalidAccountData(e.to_string()))
    }
}
