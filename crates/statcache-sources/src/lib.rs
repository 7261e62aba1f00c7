//! # statcache sources
//!
//! External collaborators consumed by the statcache server.
//!
//! ## Features
//!
//! - `StatsSource`: fetches raw player documents from the upstream API
//! - `IdentityResolver`: maps an account id to the player's current name
//! - `SnapshotSource`: supplies a prior snapshot for trailing-period stats
//!
//! ## Example
//!
//! ```ignore
//! use statcache_sources::{HttpStatsSource, StatsSource, UpstreamConfig};
//!
//! let config = UpstreamConfig::builder()
//!     .api_key("your-api-key")
//!     .timeout_secs(5)
//!     .build()?;
//!
//! let source = HttpStatsSource::new(config)?;
//! let raw = source.fetch("alice").await?;
//! ```

pub mod error;
pub mod identity;
pub mod snapshot;
pub mod source;

// Re-exports
pub use error::{IdentityError, SnapshotError, UpstreamError};
pub use identity::{DEFAULT_SESSION_URL, IdentityResolver, SessionProfileResolver};
pub use snapshot::{DirSnapshotSource, NoSnapshots, SnapshotSource};
pub use source::{HttpStatsSource, StatsSource, UpstreamConfig, UpstreamConfigBuilder};

// Re-export statcache_core for consumers
pub use statcache_core;
