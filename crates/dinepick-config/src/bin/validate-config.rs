//! Config validation CLI tool
//!
//! Validates a dinepick configuration file and reports any errors.

use dinepick_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a dinepick configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match dinepick_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", dinepick_config::CURRENT_CONFIG_VERSION);
            println!("  Data directory: {}", settings.storage.data_dir.display());
            match &settings.search.dataset {
                Some(dataset) => println!("  Dataset: {}", dataset.display()),
                None => println!("  Dataset: (none)"),
            }
            println!("  Default radius: {} km", settings.search.default_radius_km);
            println!(
                "  History: {} entries, {}h dedup window",
                settings.history.max_entries, settings.history.dedup_window_hours
            );
            println!(
                "  Roulette: {}-{} steps, {:?} settle",
                settings.roulette.min_steps, settings.roulette.max_steps, settings.roulette.settle
            );

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                dinepick_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                dinepick_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                dinepick_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                dinepick_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        dinepick_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
