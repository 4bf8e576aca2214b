//! Data model shared by every dinepick crate
//!
//! This crate defines the records that flow between the search provider,
//! the picker and the persistence stores:
//! - Restaurants, locations and filters
//! - Stored records (history, preferences, ratings)
//! - Share and export payloads
//!
//! All records serialize as camelCase JSON. Optional fields are omitted when
//! absent and default when missing, so stored documents stay readable as
//! fields are added.

mod export;
mod records;
mod types;

pub use export::*;
pub use records::*;
pub use types::*;

/// Version stamped into export snapshots
pub const EXPORT_VERSION: u32 = 1;
