//! statcache server - caching HTTP proxy for player statistics.
//!
//! Requests for a player are answered from a local cache while the stored
//! document is younger than the configured TTL, and fetched from the
//! upstream API otherwise.

pub mod cache;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use gateway::{LookupError, LookupOutcome, StatsGateway};
pub use handlers::health::HealthResponse;
pub use server::{create_router, create_router_with_state, run_server_with_state};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
