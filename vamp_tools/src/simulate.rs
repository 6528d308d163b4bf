use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vamp_engine::util::parse_eth_address;
use vamp_engine::{
    AllocationProof, Attestation, ClaimArgs, ClaimReceipt, EngineConfig, InitializeArgs, Pubkey,
    VampEvent, VampLedger, VampingParams,
};

fn decode_signature(value: &Option<String>) -> Result<Vec<u8>> {
    match value.as_deref() {
        None | Some("") => Ok(Vec::new()),
        Some(hex_sig) => Ok(hex::decode(hex_sig.strip_prefix("0x").unwrap_or(hex_sig))?),
    }
}

/// One published claim: balance `b` with solver (`ss`), validator (`vs`) and
/// owner (`os`) signatures, plus where the tokens go.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimEntry {
    pub eth_address: String,
    pub claimant: Pubkey,
    /// Lamports credited to the claimant before the claim.
    #[serde(default)]
    pub deposit: u64,
    pub b: String,
    #[serde(default)]
    pub ss: Option<String>,
    #[serde(default)]
    pub vs: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub proof: Option<AllocationProof>,
}

impl ClaimEntry {
    pub fn to_claim_args(&self, mint: Pubkey) -> Result<ClaimArgs> {
        let balance = self
            .b
            .parse::<u64>()
            .with_context(|| format!("Invalid balance {:?}", self.b))?;
        Ok(ClaimArgs {
            mint,
            claimant: self.claimant,
            eth_address: parse_eth_address(&self.eth_address)?,
            balance,
            attestation: Attestation {
                solver: decode_signature(&self.ss).context("Invalid solver signature")?,
                validator: decode_signature(&self.vs).context("Invalid validator signature")?,
                owner: decode_signature(&self.os).context("Invalid owner signature")?,
            },
            proof: self.proof.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClaimOutcome {
    Claimed(ClaimReceipt),
    Rejected { eth_address: String, error: String },
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub mint: Pubkey,
    pub claims: Vec<ClaimOutcome>,
    pub events: Vec<VampEvent>,
}

pub struct Simulation {
    pub authority: Pubkey,
    pub vamp_identifier: Option<u64>,
    pub vamping_params: Option<VampingParams>,
}

impl Simulation {
    pub async fn run(
        &self,
        config: &EngineConfig,
        vamping_data: Vec<u8>,
        entries: &[ClaimEntry],
    ) -> Result<SimulationReport> {
        let ledger = VampLedger::new(config);
        let vamp_state = ledger
            .initialize(
                self.authority,
                InitializeArgs {
                    vamp_identifier: self.vamp_identifier,
                    vamping_data,
                    vamping_params: self.vamping_params,
                },
            )
            .await
            .context("Failed to initialize vamp")?;
        info!(mint = %vamp_state.mint, claims = entries.len(), "Replaying claims");

        let mut claims = Vec::with_capacity(entries.len());
        for entry in entries {
            let args = entry.to_claim_args(vamp_state.mint)?;
            if entry.deposit > 0 {
                ledger.deposit_lamports(entry.claimant, entry.deposit).await?;
            }
            match ledger.claim(args).await {
                Ok(receipt) => claims.push(ClaimOutcome::Claimed(receipt)),
                Err(err) => claims.push(ClaimOutcome::Rejected {
                    eth_address: entry.eth_address.clone(),
                    error: err.to_string(),
                }),
            }
        }

        let rejected = claims
            .iter()
            .filter(|c| matches!(c, ClaimOutcome::Rejected { .. }))
            .count();
        if rejected > 0 {
            warn!(rejected, "Some claims were rejected");
        }

        Ok(SimulationReport {
            mint: vamp_state.mint,
            claims,
            events: ledger.events().await,
        })
    }
}

pub fn load_claim_entries(path: &Path) -> Result<Vec<ClaimEntry>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let entries: Vec<ClaimEntry> = serde_json::from_str(&content)
        .map_err(|e| anyhow!("Invalid claim entries in {}: {e}", path.display()))?;
    Ok(entries)
}
