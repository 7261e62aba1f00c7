//! Player data gateway.
//!
//! Decides for each request whether the cached document is usable, fetches
//! from upstream when it is not, and only ever caches documents that name a
//! real player.

mod single_flight;

pub use single_flight::{Flight, FlightGroup, Joined};

use std::sync::Arc;
use std::time::{Duration, Instant};

use statcache_core::RawStats;
use statcache_sources::{StatsSource, UpstreamError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheKey, ExpiringCache};
use crate::metrics::record_upstream_fetch;

/// Default bound on a single upstream fetch.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// How a successful lookup was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Served from a fresh cache record.
    CacheHit,
    /// Fetched from upstream and stored.
    CacheMissFetch,
}

impl LookupOutcome {
    /// Value for the `x-cache` response header.
    pub fn as_header_value(&self) -> &'static str {
        match self {
            Self::CacheHit => "HIT",
            Self::CacheMissFetch => "MISS",
        }
    }
}

/// A player document together with where it came from.
#[derive(Debug, Clone)]
pub struct PlayerData {
    pub key: CacheKey,
    pub raw: RawStats,
    pub outcome: LookupOutcome,
}

/// Failures surfaced to the request handler.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// The upstream answered but knows no such player.
    #[error("invalid player: {player}")]
    InvalidPlayer { player: String },

    /// The upstream could not be reached or answered with an error.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] UpstreamError),
}

impl LookupError {
    /// Returns true if the caller supplied a bad identifier.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPlayer { .. })
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bound on one upstream fetch.
    pub upstream_timeout: Duration,
    /// Coalesce concurrent misses for the same key into one fetch whose
    /// result, success or failure, every caller receives.
    pub single_flight: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            single_flight: true,
        }
    }
}

/// Cache-fronted access to upstream player documents.
pub struct StatsGateway {
    cache: ExpiringCache,
    source: Arc<dyn StatsSource>,
    flights: Option<FlightGroup<Result<PlayerData, LookupError>>>,
    upstream_timeout: Duration,
}

impl StatsGateway {
    /// Creates a gateway over `cache` and `source`.
    pub fn new(cache: ExpiringCache, source: Arc<dyn StatsSource>, config: GatewayConfig) -> Self {
        Self {
            cache,
            source,
            flights: config.single_flight.then(FlightGroup::new),
            upstream_timeout: config.upstream_timeout,
        }
    }

    /// Returns the document for `player`, from cache when fresh.
    ///
    /// # Errors
    ///
    /// - `LookupError::InvalidPlayer` if upstream has no such player (not cached)
    /// - `LookupError::UpstreamUnavailable` on transport, status or timeout failure
    pub async fn get_player_data(&self, player: &str) -> Result<PlayerData, LookupError> {
        let result = self.resolve(CacheKey::new(player)).await;

        // Un solo hit/miss por request, segun como se sirvio.
        let metrics = self.cache.metrics();
        match &result {
            Ok(data) if data.outcome == LookupOutcome::CacheHit => metrics.record_hit(),
            _ => metrics.record_miss(),
        }

        result
    }

    async fn resolve(&self, key: CacheKey) -> Result<PlayerData, LookupError> {
        if let Some(raw) = self.cached(&key).await {
            return Ok(Self::hit(key, raw));
        }

        let Some(flights) = &self.flights else {
            return self.fetch_and_store(key).await;
        };

        match flights.join(&key).await {
            Joined::Shared(result) => {
                debug!(player = %key, ok = result.is_ok(), "Served by concurrent fetch");
                result
            },
            Joined::Leader(flight) => {
                // Un lider anterior pudo haber llenado el cache justo antes.
                let result = match self.cached(&key).await {
                    Some(raw) => Ok(Self::hit(key, raw)),
                    None => self.fetch_and_store(key).await,
                };
                flight.complete(&result);
                result
            },
        }
    }

    async fn cached(&self, key: &CacheKey) -> Option<RawStats> {
        let raw = RawStats::new(self.cache.peek(key).await?);

        if raw.has_success_marker() {
            Some(raw)
        } else {
            warn!(player = %key, "Cached document lacks player marker, refetching");
            None
        }
    }

    fn hit(key: CacheKey, raw: RawStats) -> PlayerData {
        debug!(player = %key, "Loaded data from cache");
        PlayerData {
            key,
            raw,
            outcome: LookupOutcome::CacheHit,
        }
    }

    async fn fetch_and_store(&self, key: CacheKey) -> Result<PlayerData, LookupError> {
        let start = Instant::now();
        let source = self.source.name();

        let fetched = tokio::time::timeout(self.upstream_timeout, self.source.fetch(key.as_str())).await;

        let raw = match fetched {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                if e.is_transient() {
                    warn!(player = %key, error = %e, "Upstream fetch failed");
                } else {
                    error!(player = %key, error = %e, "Upstream refused request");
                }
                record_upstream_fetch(source, "error", start.elapsed());
                return Err(LookupError::UpstreamUnavailable(e));
            },
            Err(_) => {
                warn!(
                    player = %key,
                    timeout_ms = self.upstream_timeout.as_millis() as u64,
                    "Upstream fetch timed out"
                );
                record_upstream_fetch(source, "timeout", start.elapsed());
                return Err(LookupError::UpstreamUnavailable(UpstreamError::Timeout {
                    after: self.upstream_timeout,
                }));
            },
        };

        if !raw.has_success_marker() {
            info!(player = %key, "Upstream has no such player");
            record_upstream_fetch(source, "invalid_player", start.elapsed());
            return Err(LookupError::InvalidPlayer {
                player: key.to_string(),
            });
        }

        record_upstream_fetch(source, "ok", start.elapsed());
        self.cache.store(&key, raw.as_value().clone()).await;
        info!(player = %key, "Retrieved fresh data");

        Ok(PlayerData {
            key,
            raw,
            outcome: LookupOutcome::CacheMissFetch,
        })
    }

    /// The cache in front of the upstream.
    pub fn cache(&self) -> &ExpiringCache {
        &self.cache
    }

    /// Whether concurrent misses are coalesced.
    pub fn single_flight(&self) -> bool {
        self.flights.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CacheIoError, CacheRecord, CacheStore, MemoryStore};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Source que cuenta llamadas y responde segun el nombre.
    struct CountingSource {
        calls: AtomicU32,
        delay: Duration,
    }

    impl CountingSource {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                delay,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatsSource for CountingSource {
        async fn fetch(&self, player: &str) -> Result<RawStats, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;

            match player {
                "offline" => Err(UpstreamError::unavailable("connection refused")),
                "ghost" => Ok(RawStats::new(json!({"success": true, "player": null}))),
                name => Ok(RawStats::new(json!({
                    "success": true,
                    "player": {"displayname": name}
                }))),
            }
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn gateway(source: Arc<CountingSource>, config: GatewayConfig) -> StatsGateway {
        let cache = ExpiringCache::new(Arc::new(MemoryStore::default()), CacheConfig::default());
        StatsGateway::new(cache, source, config)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let source = CountingSource::new(Duration::ZERO);
        let gateway = gateway(source.clone(), GatewayConfig::default());

        let first = gateway.get_player_data("Alice").await.unwrap();
        let second = gateway.get_player_data("alice").await.unwrap();

        assert_eq!(first.outcome, LookupOutcome::CacheMissFetch);
        assert_eq!(second.outcome, LookupOutcome::CacheHit);
        assert_eq!(first.raw, second.raw);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_receives_normalized_key() {
        let source = CountingSource::new(Duration::ZERO);
        let gateway = gateway(source, GatewayConfig::default());

        let data = gateway.get_player_data("  BoB ").await.unwrap();

        assert_eq!(data.key.as_str(), "bob");
        assert_eq!(data.raw.display_name(), Some("bob"));
    }

    #[tokio::test]
    async fn test_invalid_player_not_cached() {
        let source = CountingSource::new(Duration::ZERO);
        let gateway = gateway(source.clone(), GatewayConfig::default());

        let err = gateway.get_player_data("ghost").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidPlayer { .. }));
        assert!(err.is_client_error());

        assert!(gateway.cache().lookup(&CacheKey::new("ghost")).await.is_none());

        // Un reintento vuelve a consultar el upstream
        let _ = gateway.get_player_data("ghost").await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_upstream_error_not_cached() {
        let source = CountingSource::new(Duration::ZERO);
        let gateway = gateway(source, GatewayConfig::default());

        let err = gateway.get_player_data("offline").await.unwrap_err();

        assert!(matches!(err, LookupError::UpstreamUnavailable(_)));
        assert!(!err.is_client_error());
        assert!(gateway.cache().lookup(&CacheKey::new("offline")).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_timeout() {
        let source = CountingSource::new(Duration::from_secs(30));
        let gateway = gateway(
            source,
            GatewayConfig {
                upstream_timeout: Duration::from_secs(2),
                single_flight: true,
            },
        );

        let err = gateway.get_player_data("slowpoke").await.unwrap_err();

        assert!(matches!(
            err,
            LookupError::UpstreamUnavailable(UpstreamError::Timeout { after }) if after == Duration::from_secs(2)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_timeout_is_reported_exactly() {
        let source = CountingSource::new(Duration::from_secs(30));
        let gateway = gateway(
            source,
            GatewayConfig {
                upstream_timeout: Duration::from_millis(250),
                single_flight: true,
            },
        );

        let err = gateway.get_player_data("slowpoke").await.unwrap_err();

        assert!(err.to_string().contains("250ms"), "got: {}", err);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_timeouts_share_one_fetch() {
        let source = CountingSource::new(Duration::from_secs(30));
        let gateway = Arc::new(gateway(
            source.clone(),
            GatewayConfig {
                upstream_timeout: Duration::from_secs(2),
                single_flight: true,
            },
        ));

        let mut handles = vec![];
        for _ in 0..5 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                let start = tokio::time::Instant::now();
                let result = gateway.get_player_data("slowpoke").await;
                (result, start.elapsed())
            }));
        }

        for handle in handles {
            let (result, elapsed) = handle.await.unwrap();
            assert!(matches!(
                result,
                Err(LookupError::UpstreamUnavailable(UpstreamError::Timeout { .. }))
            ));
            // Acotado por un solo timeout, no por uno por request en cola
            assert!(elapsed < Duration::from_millis(2_100), "waited {:?}", elapsed);
        }

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_invalid_player_shares_one_fetch() {
        let source = CountingSource::new(Duration::from_millis(20));
        let gateway = Arc::new(gateway(source.clone(), GatewayConfig::default()));

        let mut handles = vec![];
        for _ in 0..10 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                gateway.get_player_data("ghost").await
            }));
        }

        for handle in handles {
            assert!(matches!(
                handle.await.unwrap(),
                Err(LookupError::InvalidPlayer { .. })
            ));
        }

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_hit_and_miss_counted_once_per_request() {
        let source = CountingSource::new(Duration::ZERO);
        let gateway = gateway(source.clone(), GatewayConfig::default());

        // Miss normal
        gateway.get_player_data("alice").await.unwrap();
        // Payload en cache sin marcador: cuenta como miss
        gateway.cache().store(&CacheKey::new("zed"), json!({"success": true})).await;
        gateway.get_player_data("zed").await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(gateway.cache().metrics().hits(), 0);
        assert_eq!(gateway.cache().metrics().misses(), 2);

        gateway.get_player_data("alice").await.unwrap();
        assert_eq!(gateway.cache().metrics().hits(), 1);
        assert_eq!(gateway.cache().metrics().misses(), 2);
    }

    /// Store que no puede leer ni escribir.
    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn read(&self, key: &CacheKey) -> Result<Option<CacheRecord>, CacheIoError> {
            Err(CacheIoError::corrupt(key, "unreadable"))
        }

        async fn write(&self, record: &CacheRecord) -> Result<(), CacheIoError> {
            Err(CacheIoError::io(
                &record.key,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }

        async fn remove(&self, _key: &CacheKey) -> Result<(), CacheIoError> {
            Ok(())
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_serves_fetched_document() {
        let source = CountingSource::new(Duration::ZERO);
        let cache = ExpiringCache::new(Arc::new(BrokenStore), CacheConfig::default());
        let gateway = StatsGateway::new(cache, source.clone(), GatewayConfig::default());

        let data = gateway.get_player_data("Alice").await.unwrap();

        assert_eq!(data.outcome, LookupOutcome::CacheMissFetch);
        assert_eq!(data.raw.display_name(), Some("alice"));
        assert!(gateway.cache().metrics().io_failures() >= 1);

        // Nada quedo en cache: el siguiente request vuelve al upstream
        let again = gateway.get_player_data("alice").await.unwrap();
        assert_eq!(again.outcome, LookupOutcome::CacheMissFetch);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_cached_document_without_marker_is_refetched() {
        let source = CountingSource::new(Duration::ZERO);
        let gateway = gateway(source.clone(), GatewayConfig::default());
        let key = CacheKey::new("carol");

        gateway.cache().store(&key, json!({"success": true})).await;

        let data = gateway.get_player_data("carol").await.unwrap();

        assert_eq!(data.outcome, LookupOutcome::CacheMissFetch);
        assert_eq!(source.calls(), 1);
        let cached: Value = gateway.cache().lookup(&key).await.unwrap();
        assert_eq!(cached["player"]["displayname"], "carol");
    }

    #[tokio::test]
    async fn test_single_flight_coalesces_concurrent_misses() {
        let source = CountingSource::new(Duration::from_millis(20));
        let gateway = Arc::new(gateway(source.clone(), GatewayConfig::default()));

        let mut handles = vec![];
        for _ in 0..50 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                gateway.get_player_data("Dave").await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_without_single_flight() {
        let source = CountingSource::new(Duration::ZERO);
        let gateway = gateway(
            source.clone(),
            GatewayConfig {
                single_flight: false,
                ..GatewayConfig::default()
            },
        );

        assert!(!gateway.single_flight());
        gateway.get_player_data("erin").await.unwrap();
        gateway.get_player_data("erin").await.unwrap();

        assert_eq!(source.calls(), 1);
    }
}
