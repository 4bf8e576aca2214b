//! Picking logic for dinepick
//!
//! This crate is the heart of dinepick, containing:
//! - Distance and opening-hours evaluation
//! - Filtering and uniform random selection
//! - The roulette state machine (Idle -> Spinning -> Settling -> Stopped)
//!   and its cancellable timer driver
//! - The picker engine that sequences selection side effects
//! - Share links and data export

mod distance;
mod engine;
mod events;
mod filter;
mod hours;
mod messages;
mod roulette;
mod select;
mod share;

pub use distance::*;
pub use engine::*;
pub use events::*;
pub use filter::*;
pub use hours::*;
pub use messages::*;
pub use roulette::*;
pub use select::*;
pub use share::*;
