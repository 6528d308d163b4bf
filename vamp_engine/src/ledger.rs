use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, VampError};
use crate::event::VampEvent;
use crate::instructions::calculate_claim_cost::{quote_claim, ClaimQuote};
use crate::instructions::claim::{buy_claim_tokens, Claim, ClaimArgs, ClaimReceipt};
use crate::instructions::initialize::{Initialize, InitializeArgs, VampingParams};
use crate::mapping::AuthorizationSettings;
use crate::pubkey::Pubkey;
use crate::quorum::{EthereumPersonalSign, SignatureScheme};
use crate::state::pda::{find_claim_address, VampAddresses};
use crate::state::vamp_state::{ClaimState, VampState};
use crate::state::AccountData;

/// Accounts, balances and events of one ledger.
#[derive(Debug, Default)]
pub struct LedgerState {
    /// Program-owned account data by address.
    pub(crate) accounts: HashMap<Pubkey, Vec<u8>>,
    pub(crate) lamports: HashMap<Pubkey, u64>,
    /// Token balances keyed by `(mint, holder)`.
    pub(crate) token_balances: HashMap<(Pubkey, Pubkey), u64>,
    pub(crate) events: Vec<VampEvent>,
}

/// In-process store for vamps and claims.
///
/// `initialize` and `claim` each run under the write lock from first read to
/// last write, so concurrent claims for one source address serialize and
/// exactly one of them commits.
#[derive(Clone)]
pub struct VampLedger {
    program_id: Pubkey,
    settings: AuthorizationSettings,
    defaults: VampingParams,
    scheme: Arc<dyn SignatureScheme>,
    state: Arc<RwLock<LedgerState>>,
}

impl VampLedger {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_scheme(config, Arc::new(EthereumPersonalSign))
    }

    pub fn with_scheme(config: &EngineConfig, scheme: Arc<dyn SignatureScheme>) -> Self {
        Self {
            program_id: config.program_id(),
            settings: config.authorization,
            defaults: config.pricing,
            scheme,
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn scheme_name(&self) -> &'static str {
        self.scheme.name()
    }

    pub async fn initialize(&self, authority: Pubkey, args: InitializeArgs) -> Result<VampState> {
        let mut state = self.state.write().await;
        let mut ctx = Initialize {
            authority,
            program_id: self.program_id,
            settings: &self.settings,
            defaults: &self.defaults,
            ledger: &mut *state,
        };
        match ctx.create_token_mint(args) {
            Ok(vamp_state) => {
                info!(
                    mint = %vamp_state.mint,
                    vamp_identifier = vamp_state.vamp_identifier,
                    minted_supply = vamp_state.minted_supply,
                    symbol = %vamp_state.metadata.symbol,
                    "Token mint created"
                );
                Ok(vamp_state)
            }
            Err(err) => {
                warn!(%authority, error = %err, "Vamp initialization rejected");
                Err(err)
            }
        }
    }

    pub async fn claim(&self, args: ClaimArgs) -> Result<ClaimReceipt> {
        let mut state = self.state.write().await;
        let ctx = Claim {
            program_id: self.program_id,
            scheme: self.scheme.as_ref(),
            ledger: &mut *state,
        };
        match buy_claim_tokens(ctx, &args) {
            Ok(receipt) => {
                info!(
                    mint = %receipt.mint,
                    eth_address = %receipt.eth_address,
                    claimant = %receipt.claimant,
                    amount = receipt.amount,
                    cost = receipt.cost,
                    "Tokens claimed"
                );
                Ok(receipt)
            }
            Err(err) => {
                warn!(
                    mint = %args.mint,
                    eth_address = %hex::encode(args.eth_address),
                    error = %err,
                    "Claim rejected"
                );
                Err(err)
            }
        }
    }

    /// Credits `owner` and returns the new balance.
    pub async fn deposit_lamports(&self, owner: Pubkey, amount: u64) -> Result<u64> {
        let mut state = self.state.write().await;
        let balance = state.lamports.entry(owner).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(VampError::ArithmeticOverflow)?;
        Ok(*balance)
    }

    pub async fn lamports(&self, owner: &Pubkey) -> u64 {
        self.state
            .read()
            .await
            .lamports
            .get(owner)
            .copied()
            .unwrap_or(0)
    }

    pub async fn token_balance(&self, mint: &Pubkey, owner: &Pubkey) -> u64 {
        self.state
            .read()
            .await
            .token_balances
            .get(&(*mint, *owner))
            .copied()
            .unwrap_or(0)
    }

    pub async fn raw_account(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.state.read().await.accounts.get(address).cloned()
    }

    pub async fn vamp_state(&self, mint: &Pubkey) -> Result<VampState> {
        let addresses = VampAddresses::for_mint(mint, &self.program_id)?;
        let state = self.state.read().await;
        let data = state
            .accounts
            .get(&addresses.vamp_state)
            .ok_or(VampError::VampNotFound)?;
        VampState::try_from_account_bytes(data)
    }

    pub async fn claim_state(&self, mint: &Pubkey, eth_address: &[u8; 20]) -> Result<Option<ClaimState>> {
        let addresses = VampAddresses::for_mint(mint, &self.program_id)?;
        let (claim_address, _) =
            find_claim_address(&addresses.vamp_state, eth_address, &self.program_id)?;
        let state = self.state.read().await;
        state
            .accounts
            .get(&claim_address)
            .map(|data| ClaimState::try_from_account_bytes(data))
            .transpose()
    }

    pub async fn is_claimed(&self, mint: &Pubkey, eth_address: &[u8; 20]) -> Result<bool> {
        Ok(self
            .claim_state(mint, eth_address)
            .await?
            .is_some_and(|claim| claim.is_claimed))
    }

    /// Prices `amount` against the vamp's current supply without claiming.
    pub async fn quote(&self, mint: &Pubkey, amount: u64) -> Result<ClaimQuote> {
        let vamp_state = self.vamp_state(mint).await?;
        quote_claim(vamp_state.token_supply, amount, &vamp_state.pricing_mode()?)
    }

    pub async fn events(&self) -> Vec<VampEvent> {
        self.state.read().await.events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deposit_lamports_accumulates() {
        let ledger = VampLedger::new(&EngineConfig::default());
        let owner = Pubkey::new_from_array([5; 32]);
        assert_eq!(ledger.deposit_lamports(owner, 10).await, Ok(10));
        assert_eq!(ledger.deposit_lamports(owner, 5).await, Ok(15));
        assert_eq!(ledger.lamports(&owner).await, 15);
        assert_eq!(
            ledger.deposit_lamports(owner, u64::MAX).await,
            Err(VampError::ArithmeticOverflow)
        );
        assert_eq!(ledger.lamports(&owner).await, 15);
    }

    #[tokio::test]
    async fn test_unknown_vamp_reads() {
        let ledger = VampLedger::new(&EngineConfig::default());
        let mint = Pubkey::new_from_array([6; 32]);
        assert_eq!(ledger.vamp_state(&mint).await, Err(VampError::VampNotFound));
        assert_eq!(ledger.is_claimed(&mint, &[1; 20]).await, Ok(false));
        assert!(ledger.events().await.is_empty());
        assert_eq!(ledger.scheme_name(), "ethereum-personal-sign");
    }
}
