//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    #[serde(default)]
    pub storage: RawStorageConfig,

    #[serde(default)]
    pub search: RawSearchConfig,

    #[serde(default)]
    pub picker: RawPickerConfig,

    #[serde(default)]
    pub history: RawHistoryConfig,

    #[serde(default)]
    pub roulette: RawRouletteConfig,

    #[serde(default)]
    pub share: RawShareConfig,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            config_version: crate::CURRENT_CONFIG_VERSION,
            storage: RawStorageConfig::default(),
            search: RawSearchConfig::default(),
            picker: RawPickerConfig::default(),
            history: RawHistoryConfig::default(),
            roulette: RawRouletteConfig::default(),
            share: RawShareConfig::default(),
        }
    }
}

/// Where local data lives
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Data directory holding the key-value database
    pub data_dir: Option<PathBuf>,
}

/// Restaurant search settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSearchConfig {
    /// JSON file of restaurants used by the offline search provider
    pub dataset: Option<PathBuf>,

    /// Radius used when neither filters nor preferences give one (km)
    pub default_radius_km: Option<f64>,
}

/// Pick flow timing and exclusion window
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPickerConfig {
    /// Suspense delay before reporting a pick when animations are on
    pub suspense_ms: Option<u64>,

    /// Suspense delay when animations are off
    pub quick_suspense_ms: Option<u64>,

    /// Lookback used by "exclude recently visited"
    pub recent_window_hours: Option<u32>,
}

/// History retention
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawHistoryConfig {
    /// Maximum number of retained entries
    pub max_entries: Option<usize>,

    /// Re-selections of the same restaurant within this window are not logged
    pub dedup_window_hours: Option<u32>,
}

/// Roulette wheel timing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRouletteConfig {
    /// Delay before the second step
    pub initial_step_ms: Option<u64>,

    /// Lower bound of the random step count (inclusive)
    pub min_steps: Option<u32>,

    /// Upper bound of the random step count (inclusive)
    pub max_steps: Option<u32>,

    /// Pause between settling on the final index and reporting it
    pub settle_ms: Option<u64>,

    /// Delay before reporting when animations are disabled
    pub bypass_ms: Option<u64>,
}

/// Share link generation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawShareConfig {
    /// Origin that shared links point to
    pub base_url: Option<String>,
}
