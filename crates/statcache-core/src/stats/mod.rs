//! Derived player statistics.
//!
//! Everything here is pure: the same counters always produce the same view.

mod aggregate;
mod derived;
mod trailing;

pub use aggregate::{safe_divide, sum_excluding};
pub use derived::{DerivedStats, ELIMINATION_PREFIXES, FINAL_PREFIX};
pub use trailing::TrailingPeriodStats;
