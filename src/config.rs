//! Configuration for keiba-points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::storage::MAX_HISTORY_ENTRIES;

/// History configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_history_dir")]
    pub dir: String,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_history_dir() -> String {
    "data/history".to_string()
}

fn default_max_entries() -> usize {
    MAX_HISTORY_ENTRIES
}

fn default_debounce_ms() -> u64 {
    600
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dir: default_history_dir(),
            max_entries: default_max_entries(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl HistoryConfig {
    pub fn dir_path(&self) -> PathBuf {
        PathBuf::from(&self.dir)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Betting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingConfig {
    /// Stake per ticket in yen
    #[serde(default = "default_unit_amount")]
    pub unit_amount: u64,
}

fn default_unit_amount() -> u64 {
    100
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            unit_amount: default_unit_amount(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub betting: BettingConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (KEIBA_POINTS_HISTORY__DEBOUNCE_MS, etc.)
            .add_source(
                config::Environment::with_prefix("KEIBA_POINTS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
