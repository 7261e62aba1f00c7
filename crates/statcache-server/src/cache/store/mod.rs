//! Storage backends for the expiring cache.
//!
//! A backend only persists records; deciding whether a record is still fresh
//! is the job of [`ExpiringCache`](super::ExpiringCache).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::keys::CacheKey;

/// Un registro persistido: payload mas el instante de escritura.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub key: CacheKey,
    pub payload: Value,
    /// Segundos desde epoch de la ultima escritura exitosa.
    pub stored_at: f64,
}

/// Error de I/O del almacenamiento del cache.
/// Nunca sale de `ExpiringCache`.
#[derive(Debug, Error)]
pub enum CacheIoError {
    #[error("cache I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt cache record for '{key}': {message}")]
    Corrupt { key: String, message: String },
}

impl CacheIoError {
    pub fn io(key: &CacheKey, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }

    pub fn corrupt(key: &CacheKey, message: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Storage for cache records, one record per key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the record for `key`, or `None` if none exists.
    async fn read(&self, key: &CacheKey) -> Result<Option<CacheRecord>, CacheIoError>;

    /// Writes `record`, replacing any previous record for its key.
    ///
    /// The write must be visible to `read` once this returns.
    async fn write(&self, record: &CacheRecord) -> Result<(), CacheIoError>;

    /// Removes the record for `key`. Removing a missing record is not an error.
    async fn remove(&self, key: &CacheKey) -> Result<(), CacheIoError>;

    /// Short backend name for logs and metrics.
    fn backend(&self) -> &'static str;
}
