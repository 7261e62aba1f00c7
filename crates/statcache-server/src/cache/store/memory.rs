//! In-process backend using Moka.

use async_trait::async_trait;
use moka::future::Cache;

use super::{CacheIoError, CacheRecord, CacheStore};
use crate::cache::keys::CacheKey;

/// Backend en memoria.
///
/// Moka solo acota la capacidad; la expiracion la decide `ExpiringCache`
/// a partir de `stored_at`, igual que con el backend de disco.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<CacheKey, CacheRecord>,
}

impl MemoryStore {
    /// Crea un store con la capacidad maxima dada.
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// Numero aproximado de registros.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn read(&self, key: &CacheKey) -> Result<Option<CacheRecord>, CacheIoError> {
        Ok(self.inner.get(key).await)
    }

    async fn write(&self, record: &CacheRecord) -> Result<(), CacheIoError> {
        self.inner.insert(record.key.clone(), record.clone()).await;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<(), CacheIoError> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
