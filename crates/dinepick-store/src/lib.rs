//! Persistence layer for dinepick
//!
//! Provides:
//! - A key-value medium (SQLite on disk, or in memory)
//! - History of past picks (capped, deduplicated)
//! - Favorites set
//! - User preferences with defaults
//! - Per-restaurant rating overlay
//!
//! Each store owns exactly one key and rewrites its whole collection as a
//! single JSON document on every mutation. Reads never fail: a missing or
//! unreadable document yields an empty collection (or default record).

mod document;
mod favorites;
mod history;
mod memory;
mod preferences;
mod ratings;
mod sqlite;
mod traits;

pub use favorites::*;
pub use history::*;
pub use memory::*;
pub use preferences::*;
pub use ratings::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<StoreError> for dinepick_util::DinepickError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidRating(_) => Self::InvalidInput(e.to_string()),
            other => Self::StoreError(other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
