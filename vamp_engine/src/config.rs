use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constant::PROGRAM_ID;
use crate::instructions::initialize::VampingParams;
use crate::mapping::AuthorizationSettings;
use crate::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub program_id: Pubkey,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: PROGRAM_ID,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub program: ProgramConfig,
    pub authorization: AuthorizationSettings,
    /// Vamping parameters used when neither the caller nor the descriptor supplies any.
    pub pricing: VampingParams,
}

impl EngineConfig {
    pub fn program_id(&self) -> Pubkey {
        self.program.program_id
    }
}

pub fn load_config(config_file_path: impl AsRef<Path>) -> anyhow::Result<EngineConfig> {
    let path = config_file_path.as_ref();
    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&config_content)
        .with_context(|| format!("Invalid config format in {}", path.display()))?;
    config
        .pricing
        .validate()
        .context("Invalid [pricing] section")?;
    Ok(config)
}
