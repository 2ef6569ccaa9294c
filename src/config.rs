use crate::core::block::COINBASE_REWARD;
use crate::core::transaction::Amount;
use crate::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::env;

/// Blocks whose height would be this far or more below the tip are refused.
pub const CUT_OFF_AGE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub cut_off_age: u64,
    /// Drop nodes that can no longer parent an admissible block.
    pub prune: bool,
    pub coinbase_reward: Amount,
    /// `env_logger` filter used by the binary when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            cut_off_age: CUT_OFF_AGE,
            prune: true,
            coinbase_reward: COINBASE_REWARD,
            log_level: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cut_off_age == 0 {
            return Err(LedgerError::Config("cut_off_age must be at least 1".to_string()));
        }

        if self.coinbase_reward < 0 {
            return Err(LedgerError::Config("coinbase_reward must not be negative".to_string()));
        }

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LedgerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn default_path() -> PathBuf {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home_dir).join(".forkchain").join("config.json")
    }
}
