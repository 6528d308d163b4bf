use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constant::{
    DEFAULT_BASE_PRICE, DEFAULT_CURVE_EXPONENT, DEFAULT_CURVE_SLOPE, DEFAULT_FLAT_PRICE_PER_TOKEN,
    DEFAULT_MAX_PRICE, MAX_CURVE_EXPONENT,
};
use crate::error::{Result, VampError};
use crate::event::TokenMintCreated;
use crate::instructions::calculate_claim_cost::{BondingCurve, PricingMode};
use crate::ledger::LedgerState;
use crate::mapping::{AuthorizationSettings, TokenMappingSet};
use crate::pubkey::Pubkey;
use crate::state::pda::VampAddresses;
use crate::state::vamp_state::{TokenMetadata, VampState};
use crate::state::AccountData;
use crate::use_proto::vamp_fun::VampingParamsProto;
use crate::util::{fold_intent_id, format_eth_address};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VampingParams {
    pub paid_claiming_enabled: bool,
    pub use_bonding_curve: bool,
    pub curve_slope: u64,
    pub base_price: u64,
    pub max_price: Option<u64>,
    pub flat_price_per_token: u64,
    pub curve_exponent: u32,
}

impl Default for VampingParams {
    fn default() -> Self {
        Self {
            paid_claiming_enabled: false,
            use_bonding_curve: false,
            curve_slope: DEFAULT_CURVE_SLOPE,
            base_price: DEFAULT_BASE_PRICE,
            max_price: Some(DEFAULT_MAX_PRICE),
            flat_price_per_token: DEFAULT_FLAT_PRICE_PER_TOKEN,
            curve_exponent: DEFAULT_CURVE_EXPONENT,
        }
    }
}

impl VampingParams {
    pub fn validate(&self) -> Result<()> {
        if self.curve_exponent > MAX_CURVE_EXPONENT {
            return Err(VampError::Decode(format!(
                "curve exponent {} exceeds {MAX_CURVE_EXPONENT}",
                self.curve_exponent
            )));
        }
        if let Some(max_price) = self.max_price {
            if self.use_bonding_curve && max_price < self.base_price {
                return Err(VampError::Decode(format!(
                    "max price {max_price} is below base price {}",
                    self.base_price
                )));
            }
        }
        Ok(())
    }

    pub fn pricing_mode(&self) -> PricingMode {
        if !self.paid_claiming_enabled {
            PricingMode::Free
        } else if !self.use_bonding_curve {
            PricingMode::FixedPrice {
                flat_price_per_token: self.flat_price_per_token,
                max_price: self.max_price,
            }
        } else {
            PricingMode::BondingCurve(BondingCurve {
                base_price: self.base_price,
                curve_slope: self.curve_slope,
                curve_exponent: self.curve_exponent,
                max_price: self.max_price,
            })
        }
    }
}

impl From<VampingParamsProto> for VampingParams {
    fn from(params: VampingParamsProto) -> Self {
        Self {
            paid_claiming_enabled: params.paid_claiming_enabled,
            use_bonding_curve: params.use_bonding_curve,
            curve_slope: params.curve_slope,
            base_price: params.base_price,
            max_price: params.max_price,
            flat_price_per_token: params.flat_price_per_token,
            curve_exponent: params.curve_exponent.unwrap_or(DEFAULT_CURVE_EXPONENT),
        }
    }
}

impl From<VampingParams> for VampingParamsProto {
    fn from(params: VampingParams) -> Self {
        Self {
            paid_claiming_enabled: params.paid_claiming_enabled,
            use_bonding_curve: params.use_bonding_curve,
            curve_slope: params.curve_slope,
            base_price: params.base_price,
            max_price: params.max_price,
            flat_price_per_token: params.flat_price_per_token,
            curve_exponent: Some(params.curve_exponent),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InitializeArgs {
    /// Defaults to the folded intent id.
    pub vamp_identifier: Option<u64>,
    pub vamping_data: Vec<u8>,
    /// Overrides the descriptor's parameters.
    pub vamping_params: Option<VampingParams>,
}

pub struct Initialize<'a> {
    pub authority: Pubkey,
    pub program_id: Pubkey,
    pub settings: &'a AuthorizationSettings,
    pub defaults: &'a VampingParams,
    pub ledger: &'a mut LedgerState,
}

impl Initialize<'_> {
    pub fn create_token_mint(&mut self, args: InitializeArgs) -> Result<VampState> {
        let mapping = TokenMappingSet::decode_with(&args.vamping_data, self.settings)?;

        // explicit argument > descriptor > configured defaults
        let params = args
            .vamping_params
            .or(mapping.vamping_params)
            .unwrap_or(*self.defaults);
        params.validate()?;

        let vamp_identifier = match args.vamp_identifier {
            Some(vamp_identifier) => vamp_identifier,
            None => fold_intent_id(&mapping.intent_id)?,
        };

        let addresses = VampAddresses::derive(&self.authority, vamp_identifier, &self.program_id)?;
        debug!(
            mint = %addresses.mint,
            vamp_state = %addresses.vamp_state,
            vault = %addresses.vault,
            sol_vault = %addresses.sol_vault,
            "Derived vamp addresses"
        );
        if self.ledger.accounts.contains_key(&addresses.vamp_state) {
            return Err(VampError::AlreadyInitialized);
        }

        let initial_price = params.pricing_mode().unit_price(0)?;
        let vamp_state = VampState {
            bump: addresses.vamp_state_bump,
            mint: addresses.mint,
            solver_public_key: mapping.solver_public_key.clone(),
            validator_public_key: mapping.validator_public_key.clone(),
            vamp_identifier,
            intent_id: mapping.intent_id.clone(),
            total_claimed: 0,
            reserve_balance: 0,
            token_supply: 0,
            curve_exponent: params.curve_exponent as u64,
            initial_price,
            sol_vault: addresses.sol_vault,
            curve_slope: params.curve_slope,
            base_price: params.base_price,
            max_price: params.max_price,
            paid_claiming_enabled: params.paid_claiming_enabled,
            use_bonding_curve: params.use_bonding_curve,
            flat_price_per_token: params.flat_price_per_token,
            authority: self.authority,
            owner_public_key: mapping.owner_public_key.clone(),
            vault: addresses.vault,
            minted_supply: mapping.amount,
            metadata: TokenMetadata {
                name: mapping.token_name.clone(),
                symbol: mapping.token_symbol.clone(),
                uri: mapping.token_uri.clone().unwrap_or_default(),
                decimals: mapping.decimals,
                erc20_address: mapping.token_erc20_address.clone(),
            },
            authorization: mapping.authorization.clone(),
        };
        let data = vamp_state.to_account_bytes()?;

        let ledger = &mut *self.ledger;
        ledger.accounts.insert(addresses.vamp_state, data);
        ledger
            .token_balances
            .insert((addresses.mint, addresses.vault), mapping.amount);
        ledger.lamports.entry(addresses.sol_vault).or_insert(0);
        ledger.events.push(
            TokenMintCreated {
                mint_account: addresses.mint,
                vamp_state: addresses.vamp_state,
                token_name: mapping.token_name,
                token_symbol: mapping.token_symbol,
                token_erc20_address: format_eth_address(&mapping.token_erc20_address),
                amount: mapping.amount,
            }
            .into(),
        );

        Ok(vamp_state)
    }
}
