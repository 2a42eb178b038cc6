use crate::core::coin_selection::DEFAULT_SELECTION_ATTEMPTS;
use crate::core::monetary::{BLOCK_REWARD, DEFAULT_HASH_PREFIX};
use crate::core::{validate_prefix, Blockchain};
use crate::error::{BlockchainError, Result};
use crate::mining::MinerConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

static DEFAULT_MEMPOOL_PATH: &str = "mempool.db";

const MEMPOOL_PATH_KEY: &str = "MEMPOOL_PATH";
const MINING_ADDRESS_KEY: &str = "MINING_ADDRESS";
const HASH_PREFIX_KEY: &str = "HASH_PREFIX";

/// Process settings: defaults, then an optional TOML file, then environment overrides
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mempool_path: PathBuf,
    pub mining_address: Option<String>,
    pub hash_prefix: String,
    pub block_reward: u64,
    pub coin_selection_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mempool_path: PathBuf::from(DEFAULT_MEMPOOL_PATH),
            mining_address: None,
            hash_prefix: DEFAULT_HASH_PREFIX.to_string(),
            block_reward: BLOCK_REWARD,
            coin_selection_attempts: DEFAULT_SELECTION_ATTEMPTS,
        }
    }
}

impl Config {
    /// Load settings, reading `path` first when one is given
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Config::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BlockchainError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment variables win over file and defaults
    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var(MEMPOOL_PATH_KEY) {
            self.mempool_path = PathBuf::from(path);
        }
        if let Ok(addr) = env::var(MINING_ADDRESS_KEY) {
            self.mining_address = Some(addr);
        }
        if let Ok(prefix) = env::var(HASH_PREFIX_KEY) {
            self.hash_prefix = prefix;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_prefix(&self.hash_prefix)?;
        if self.coin_selection_attempts == 0 {
            return Err(BlockchainError::Config(
                "coin_selection_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn miner_config(&self) -> MinerConfig {
        MinerConfig {
            reward: self.block_reward,
            hash_prefix: self.hash_prefix.clone(),
        }
    }

    /// A fresh chain using the configured coin selection budget
    pub fn new_blockchain(&self) -> Blockchain {
        Blockchain::with_selection_attempts(self.coin_selection_attempts)
    }
}
