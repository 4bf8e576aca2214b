//! Validated settings structures

use crate::schema::RawConfig;
use dinepick_util::default_data_dir;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_SUSPENSE_MS: u64 = 4000;
pub const DEFAULT_QUICK_SUSPENSE_MS: u64 = 1000;
pub const DEFAULT_RECENT_WINDOW_HOURS: u32 = 24;
pub const DEFAULT_HISTORY_MAX_ENTRIES: usize = 50;
pub const DEFAULT_DEDUP_WINDOW_HOURS: u32 = 24;
pub const DEFAULT_INITIAL_STEP_MS: u64 = 50;
pub const DEFAULT_MIN_STEPS: u32 = 20;
pub const DEFAULT_MAX_STEPS: u32 = 40;
pub const DEFAULT_SETTLE_MS: u64 = 500;
pub const DEFAULT_BYPASS_MS: u64 = 100;
pub const DEFAULT_SHARE_BASE_URL: &str = "https://dinepick.app";

/// Validated settings ready for use by the picker and stores
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub search: SearchSettings,
    pub picker: PickerSettings,
    pub history: HistorySettings,
    pub roulette: RouletteSettings,
    pub share: ShareSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            storage: StorageSettings {
                data_dir: raw.storage.data_dir.unwrap_or_else(default_data_dir),
            },
            search: SearchSettings {
                dataset: raw.search.dataset,
                default_radius_km: raw.search.default_radius_km.unwrap_or(DEFAULT_RADIUS_KM),
            },
            picker: PickerSettings {
                suspense: Duration::from_millis(
                    raw.picker.suspense_ms.unwrap_or(DEFAULT_SUSPENSE_MS),
                ),
                quick_suspense: Duration::from_millis(
                    raw.picker.quick_suspense_ms.unwrap_or(DEFAULT_QUICK_SUSPENSE_MS),
                ),
                recent_window_hours: raw
                    .picker
                    .recent_window_hours
                    .unwrap_or(DEFAULT_RECENT_WINDOW_HOURS),
            },
            history: HistorySettings {
                max_entries: raw.history.max_entries.unwrap_or(DEFAULT_HISTORY_MAX_ENTRIES),
                dedup_window_hours: raw
                    .history
                    .dedup_window_hours
                    .unwrap_or(DEFAULT_DEDUP_WINDOW_HOURS),
            },
            roulette: RouletteSettings {
                initial_step: Duration::from_millis(
                    raw.roulette.initial_step_ms.unwrap_or(DEFAULT_INITIAL_STEP_MS),
                ),
                min_steps: raw.roulette.min_steps.unwrap_or(DEFAULT_MIN_STEPS),
                max_steps: raw.roulette.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
                settle: Duration::from_millis(raw.roulette.settle_ms.unwrap_or(DEFAULT_SETTLE_MS)),
                bypass: Duration::from_millis(raw.roulette.bypass_ms.unwrap_or(DEFAULT_BYPASS_MS)),
            },
            share: ShareSettings {
                base_url: raw
                    .share
                    .base_url
                    .unwrap_or_else(|| DEFAULT_SHARE_BASE_URL.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl StorageSettings {
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(dinepick_util::DATABASE_FILENAME)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub dataset: Option<PathBuf>,
    pub default_radius_km: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            dataset: None,
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PickerSettings {
    pub suspense: Duration,
    pub quick_suspense: Duration,
    pub recent_window_hours: u32,
}

impl PickerSettings {
    /// Suspense delay for the given animation preference
    pub fn suspense_for(&self, animations_enabled: bool) -> Duration {
        if animations_enabled {
            self.suspense
        } else {
            self.quick_suspense
        }
    }

    /// Settings with no artificial delay, for tests and scripted use
    pub fn immediate() -> Self {
        Self {
            suspense: Duration::ZERO,
            quick_suspense: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            suspense: Duration::from_millis(DEFAULT_SUSPENSE_MS),
            quick_suspense: Duration::from_millis(DEFAULT_QUICK_SUSPENSE_MS),
            recent_window_hours: DEFAULT_RECENT_WINDOW_HOURS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistorySettings {
    pub max_entries: usize,
    pub dedup_window_hours: u32,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_HISTORY_MAX_ENTRIES,
            dedup_window_hours: DEFAULT_DEDUP_WINDOW_HOURS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouletteSettings {
    pub initial_step: Duration,
    pub min_steps: u32,
    pub max_steps: u32,
    pub settle: Duration,
    pub bypass: Duration,
}

impl Default for RouletteSettings {
    fn default() -> Self {
        Self {
            initial_step: Duration::from_millis(DEFAULT_INITIAL_STEP_MS),
            min_steps: DEFAULT_MIN_STEPS,
            max_steps: DEFAULT_MAX_STEPS,
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            bypass: Duration::from_millis(DEFAULT_BYPASS_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShareSettings {
    pub base_url: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SHARE_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::from_raw(RawConfig::default());

        assert_eq!(settings.search.default_radius_km, 5.0);
        assert_eq!(settings.history.max_entries, 50);
        assert_eq!(settings.history.dedup_window_hours, 24);
        assert_eq!(settings.picker.recent_window_hours, 24);
        assert_eq!(settings.roulette.min_steps, 20);
        assert_eq!(settings.roulette.max_steps, 40);
        assert_eq!(settings.roulette.initial_step, Duration::from_millis(50));
        assert_eq!(settings.roulette.settle, Duration::from_millis(500));
        assert_eq!(settings.roulette.bypass, Duration::from_millis(100));
    }

    #[test]
    fn suspense_depends_on_animations() {
        let picker = PickerSettings::default();
        assert_eq!(picker.suspense_for(true), Duration::from_millis(4000));
        assert_eq!(picker.suspense_for(false), Duration::from_millis(1000));
    }

    #[test]
    fn database_path_is_inside_data_dir() {
        let storage = StorageSettings {
            data_dir: PathBuf::from("/var/lib/dinepick"),
        };
        assert_eq!(
            storage.database_path(),
            PathBuf::from("/var/lib/dinepick/dinepick.db")
        );
    }
}
