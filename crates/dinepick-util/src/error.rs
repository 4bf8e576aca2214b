//! Error types for dinepick

use thiserror::Error;

/// Core error type for dinepick operations
#[derive(Debug, Error)]
pub enum DinepickError {
    #[error("No restaurant matches the current filters")]
    NoMatches,

    #[error("No search location available")]
    NoLocation,

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DinepickError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::ProviderError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether retrying with different input can resolve the error.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoMatches | Self::NoLocation | Self::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DinepickError>;
