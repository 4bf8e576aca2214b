//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("{min_field} ({min}) must not exceed {max_field} ({max})")]
    InvertedRange {
        min_field: String,
        min: u64,
        max_field: String,
        max: u64,
    },
}

impl ValidationError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(radius) = config.search.default_radius_km {
        if !radius.is_finite() || radius <= 0.0 {
            errors.push(ValidationError::invalid(
                "search.default_radius_km",
                "must be a positive number of kilometers",
            ));
        }
    }

    if let Some(dataset) = &config.search.dataset {
        if dataset.as_os_str().is_empty() {
            errors.push(ValidationError::invalid("search.dataset", "path cannot be empty"));
        }
    }

    if let Some(dir) = &config.storage.data_dir {
        if dir.as_os_str().is_empty() {
            errors.push(ValidationError::invalid("storage.data_dir", "path cannot be empty"));
        }
    }

    if config.picker.recent_window_hours == Some(0) {
        errors.push(ValidationError::invalid(
            "picker.recent_window_hours",
            "must be at least 1 hour",
        ));
    }

    if config.history.max_entries == Some(0) {
        errors.push(ValidationError::invalid(
            "history.max_entries",
            "must keep at least one entry",
        ));
    }

    errors.extend(validate_roulette(config));

    if let Some(url) = &config.share.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError::invalid(
                "share.base_url",
                format!("'{}' is not an http(s) URL", url),
            ));
        }
    }

    errors
}

fn validate_roulette(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let roulette = &config.roulette;

    if roulette.initial_step_ms == Some(0) {
        errors.push(ValidationError::invalid(
            "roulette.initial_step_ms",
            "must be greater than zero",
        ));
    }

    if roulette.min_steps == Some(0) {
        errors.push(ValidationError::invalid(
            "roulette.min_steps",
            "a spin needs at least one step",
        ));
    }

    let min = roulette.min_steps.unwrap_or(crate::DEFAULT_MIN_STEPS);
    let max = roulette.max_steps.unwrap_or(crate::DEFAULT_MAX_STEPS);
    if min > max {
        errors.push(ValidationError::InvertedRange {
            min_field: "roulette.min_steps".into(),
            min: u64::from(min),
            max_field: "roulette.max_steps".into(),
            max: u64::from(max),
        });
    }

    errors
}
