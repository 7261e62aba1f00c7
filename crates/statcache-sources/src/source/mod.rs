//! Player statistics source abstraction.
//!
//! This module defines the trait the gateway fetches through, plus the HTTP
//! implementation and its configuration.

mod config;
mod http;
mod traits;

pub use config::{DEFAULT_BASE_URL, UpstreamConfig, UpstreamConfigBuilder};
pub use http::HttpStatsSource;
pub use traits::StatsSource;
