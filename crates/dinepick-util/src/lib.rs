//! Shared utilities for dinepick
//!
//! This crate provides:
//! - ID types (RestaurantId, SpinId)
//! - Clock utilities (mock-able wall clock, display helpers)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
