//! statcache core - player statistics domain types
//!
//! This crate holds the raw upstream document wrapper and the pure functions
//! that turn raw Bedwars counters into all-time and trailing-period views.
//! It performs no I/O.

pub mod error;
pub mod raw;
pub mod stats;

pub use error::{Result, StatsError};
pub use raw::{RawStats, SUCCESS_MARKER};
pub use stats::{DerivedStats, TrailingPeriodStats};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
