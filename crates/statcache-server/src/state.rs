//! Application state.

use std::sync::Arc;

use statcache_sources::{
    DirSnapshotSource, HttpStatsSource, IdentityResolver, NoSnapshots, SessionProfileResolver,
    SnapshotSource,
};
use tracing::info;

use crate::cache::{CacheConfig, CacheStore, ExpiringCache, FileStore, MemoryStore};
use crate::gateway::{GatewayConfig, StatsGateway};
use crate::settings::{CacheBackend, Settings, SettingsError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<StatsGateway>,
    /// Resolves `?uuid=` lookups; `None` disables them.
    identity: Option<Arc<dyn IdentityResolver>>,
    snapshots: Arc<dyn SnapshotSource>,
}

impl AppState {
    /// Creates an AppState with uuid lookups and snapshots disabled.
    pub fn new(gateway: Arc<StatsGateway>) -> Self {
        Self {
            gateway,
            identity: None,
            snapshots: Arc::new(NoSnapshots),
        }
    }

    /// Enables uuid lookups through `resolver`.
    pub fn with_identity(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.identity = Some(resolver);
        self
    }

    /// Uses `snapshots` for trailing-period stats.
    pub fn with_snapshots(mut self, snapshots: Arc<dyn SnapshotSource>) -> Self {
        self.snapshots = snapshots;
        self
    }

    /// Wires the production collaborators described by `settings`.
    pub async fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let store: Arc<dyn CacheStore> = match settings.cache.backend {
            CacheBackend::File => Arc::new(FileStore::open(&settings.cache.dir).await?),
            CacheBackend::Memory => Arc::new(MemoryStore::new(settings.cache.max_capacity)),
        };
        info!(
            backend = store.backend(),
            dir = %settings.cache.dir.display(),
            ttl_seconds = settings.cache.ttl_seconds,
            "Cache store ready"
        );

        let cache = ExpiringCache::new(
            store,
            CacheConfig {
                ttl_seconds: settings.cache.ttl_seconds,
            },
        );

        let upstream = settings.upstream_config()?;
        let gateway_config = GatewayConfig {
            upstream_timeout: upstream.timeout(),
            single_flight: settings.cache.single_flight,
        };
        let source = Arc::new(HttpStatsSource::new(upstream)?);
        let gateway = Arc::new(StatsGateway::new(cache, source, gateway_config));

        let mut state = Self::new(gateway);

        if settings.identity.enabled {
            let resolver =
                SessionProfileResolver::new(&settings.identity.base_url, settings.identity.timeout())?;
            state = state.with_identity(Arc::new(resolver));
        }

        if let Some(dir) = &settings.snapshots.dir {
            info!(dir = %dir.display(), "Trailing-period snapshots enabled");
            state = state.with_snapshots(Arc::new(DirSnapshotSource::new(dir)));
        }

        Ok(state)
    }

    /// Returns the player gateway.
    pub fn gateway(&self) -> &StatsGateway {
        self.gateway.as_ref()
    }

    /// Returns the identity resolver, if uuid lookups are enabled.
    pub fn identity(&self) -> Option<&dyn IdentityResolver> {
        self.identity.as_deref()
    }

    /// Returns the snapshot source.
    pub fn snapshots(&self) -> &dyn SnapshotSource {
        self.snapshots.as_ref()
    }
}
