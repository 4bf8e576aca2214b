//! Collaborator trait interfaces for dinepick
//!
//! The picker talks to the outside world (device location, geocoding,
//! restaurant search, notifications, sharing) only through these traits.
//! This crate contains no network or platform code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
