//! Cache module for the statcache server.
//!
//! This module provides the time-expiring player cache: TTL-based validity,
//! case-insensitive keys, and a pluggable storage backend (one file per key
//! on disk, or Moka in memory).

pub mod clock;
pub mod expiring;
pub mod keys;
pub mod store;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use expiring::{CacheConfig, ExpiringCache};
pub use keys::CacheKey;
pub use store::{CacheIoError, CacheRecord, CacheStore, FileStore, MemoryStore};
