//! Default paths for dinepick
//!
//! Paths are user-writable (no root required):
//! - Config: `$XDG_CONFIG_HOME/dinepick/config.toml` or `~/.config/dinepick/config.toml`
//! - Data: `$XDG_DATA_HOME/dinepick` or `~/.local/share/dinepick`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const DINEPICK_CONFIG_ENV: &str = "DINEPICK_CONFIG";

/// Environment variable for overriding the data directory
pub const DINEPICK_DATA_DIR_ENV: &str = "DINEPICK_DATA_DIR";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "dinepick";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/dinepick/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/dinepick/config.toml` (fallback)
///
/// `DINEPICK_CONFIG` is handled by the CLI argument parser.
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$DINEPICK_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/dinepick` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/dinepick` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DINEPICK_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking DINEPICK_DATA_DIR env var.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Database filename inside the data directory
pub const DATABASE_FILENAME: &str = "dinepick.db";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_config_toml() {
        let path = default_config_path();
        assert!(path.to_string_lossy().contains("dinepick"));
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn data_dir_contains_dinepick() {
        let path = data_dir_without_env();
        assert!(path.to_string_lossy().contains("dinepick"));
    }
}
