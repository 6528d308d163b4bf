use crate::pubkey::Pubkey;

/// `CABA3ibLCuTDcTF4DQXuHK54LscXM5vBg7nWx1rzPaJH`
pub const PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    165, 202, 68, 81, 233, 110, 200, 3, 214, 239, 132, 220, 177, 123, 45, 113, 97, 110, 46, 206,
    249, 142, 250, 155, 89, 153, 28, 105, 211, 242, 1, 174,
]);

pub const ANCHOR_DISCRIMINATOR: usize = 8;

/// `sha256("account:VampState")[..8]`
pub const VAMP_STATE_DISCRIMINATOR: [u8; 8] = [222, 91, 2, 48, 244, 96, 192, 196];
/// `sha256("account:ClaimState")[..8]`
pub const CLAIM_STATE_DISCRIMINATOR: [u8; 8] = [71, 73, 19, 83, 53, 228, 242, 53];

pub const MINT_SEED: &[u8] = b"mint";
pub const VAMP_SEED: &[u8] = b"vamp";
pub const VAULT_SEED: &[u8] = b"vault";
pub const SOL_VAULT_SEED: &[u8] = b"sol_vault";
pub const CLAIM_SEED: &[u8] = b"claim";

pub const ETH_ADDRESS_LEN: usize = 20;
pub const MERKLE_ROOT_LEN: usize = 32;
pub const MAX_INTENT_ID_LEN: usize = 32;

// Metadata limits of the token metadata program
pub const MAX_TOKEN_NAME_LEN: usize = 32;
pub const MAX_TOKEN_SYMBOL_LEN: usize = 10;
pub const MAX_TOKEN_URI_LEN: usize = 200;

pub const MAX_TOKEN_DECIMALS: u8 = 9;
pub const MAX_CURVE_EXPONENT: u32 = 3;
pub const LAMPORTS_DECIMALS: u32 = 9;

pub const DEFAULT_MAX_INLINE_ENTRIES: usize = 1024;

// Solver-side vamping defaults
pub const DEFAULT_CURVE_SLOPE: u64 = 1;
pub const DEFAULT_BASE_PRICE: u64 = 1;
pub const DEFAULT_MAX_PRICE: u64 = 1000;
pub const DEFAULT_FLAT_PRICE_PER_TOKEN: u64 = 1;
pub const DEFAULT_CURVE_EXPONENT: u32 = 1;
