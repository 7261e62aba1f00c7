//! Time-expiring cache over a pluggable store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::keys::CacheKey;
use super::store::{CacheIoError, CacheRecord, CacheStore};
use crate::metrics::CacheMetrics;

/// Configuracion del cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL en segundos (default: 900 = 15 minutos)
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 900 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Cache de documentos con TTL fijo.
///
/// Cada lookup resuelve contra el store: un registro con
/// `now - stored_at >= ttl` se considera ausente y se borra.
/// Los errores del store se registran y se tratan como miss (lectura)
/// o se ignoran (escritura); nunca llegan al caller.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use statcache_server::cache::{CacheConfig, CacheKey, ExpiringCache, MemoryStore};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = ExpiringCache::new(Arc::new(MemoryStore::default()), CacheConfig::default());
/// let key = CacheKey::new("Alice");
///
/// cache.store(&key, serde_json::json!({"player": {}})).await;
/// assert!(cache.lookup(&CacheKey::new("alice")).await.is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct ExpiringCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    metrics: CacheMetrics,
}

impl ExpiringCache {
    /// Crea un cache sobre `store` con el reloj del sistema.
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Crea un cache con un reloj inyectado.
    pub fn with_clock(store: Arc<dyn CacheStore>, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ttl: config.ttl(),
            clock,
            metrics: CacheMetrics::new(),
        }
    }

    /// Obtiene el payload vigente para `key`.
    ///
    /// Retorna `None` si no hay registro, si expiro (y lo elimina) o si el
    /// store fallo.
    pub async fn lookup(&self, key: &CacheKey) -> Option<Value> {
        let result = self.peek(key).await;

        if result.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }

        result
    }

    /// Igual que `lookup` pero sin contar hit/miss.
    ///
    /// Para callers que deciden por su cuenta si el payload sirve y
    /// registran el resultado una sola vez.
    pub async fn peek(&self, key: &CacheKey) -> Option<Value> {
        let start = Instant::now();
        let result = self.lookup_inner(key).await;
        self.metrics
            .record_operation_duration("lookup", start.elapsed());
        result
    }

    async fn lookup_inner(&self, key: &CacheKey) -> Option<Value> {
        let record = match self.store.read(key).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                self.metrics.record_io_failure("read");
                return None;
            },
        };

        let age = self.clock.now() - record.stored_at;
        if age >= self.ttl.as_secs_f64() {
            debug!(key = %key, age_secs = age, "Cache record expired");
            self.metrics.record_expiration();

            if let Err(e) = self.remove_if_unchanged(key, record.stored_at).await {
                warn!(key = %key, error = %e, "Failed to remove expired cache record");
                self.metrics.record_io_failure("remove");
            }
            return None;
        }

        Some(record.payload)
    }

    /// Borra el registro solo si sigue siendo el que se leyo expirado; un
    /// `store` concurrente pudo haberlo reemplazado por uno fresco.
    async fn remove_if_unchanged(&self, key: &CacheKey, stored_at: f64) -> Result<(), CacheIoError> {
        match self.store.read(key).await? {
            Some(current) if current.stored_at == stored_at => self.store.remove(key).await,
            Some(_) => {
                debug!(key = %key, "Expired record was refreshed concurrently, keeping it");
                Ok(())
            },
            None => Ok(()),
        }
    }

    /// Escribe (o sobreescribe) el registro de `key` con `stored_at = now`.
    ///
    /// Un fallo de escritura es solo un warning: el caller ya tiene los datos.
    pub async fn store(&self, key: &CacheKey, payload: Value) {
        let start = Instant::now();
        let record = CacheRecord {
            key: key.clone(),
            payload,
            stored_at: self.clock.now(),
        };

        if let Err(e) = self.store.write(&record).await {
            warn!(key = %key, error = %e, "Cache write failed, serving uncached data");
            self.metrics.record_io_failure("write");
        }

        self.metrics
            .record_operation_duration("store", start.elapsed());
    }

    /// TTL configurado.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Nombre del backend subyacente.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}
