//! Statistics source trait definition.

use async_trait::async_trait;
use statcache_core::RawStats;

use crate::error::UpstreamError;

/// A source of raw player statistics.
///
/// This trait abstracts over the upstream statistics service so the gateway
/// can be exercised against an in-process source in tests.
///
/// # Implementors
///
/// - `HttpStatsSource` - Fetches documents from the upstream HTTP API
///
/// # Example
///
/// ```ignore
/// use statcache_sources::{StatsSource, UpstreamError};
/// use statcache_core::RawStats;
///
/// struct FixedSource;
///
/// #[async_trait]
/// impl StatsSource for FixedSource {
///     async fn fetch(&self, player: &str) -> Result<RawStats, UpstreamError> {
///         Ok(RawStats::new(serde_json::json!({"player": {"displayname": player}})))
///     }
///
///     fn name(&self) -> &str {
///         "fixed"
///     }
/// }
/// ```
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetches the raw document for a normalized player name.
    ///
    /// The returned document is not classified: a document without a
    /// `player` field is still `Ok`. Deciding whether it names a real player
    /// is the caller's job.
    ///
    /// # Errors
    ///
    /// - `UpstreamError::Unavailable` / `Timeout` on transport failure
    /// - `UpstreamError::Status` on a non-2xx response
    /// - `UpstreamError::Rejected` when the upstream answers `success: false`
    async fn fetch(&self, player: &str) -> Result<RawStats, UpstreamError>;

    /// Returns the name of this source.
    ///
    /// This is used for logging and metrics labels.
    fn name(&self) -> &str;
}
