//! Metrics module for the statcache server.

pub mod cache;
pub mod http;
pub mod setup;
pub mod upstream;

pub use cache::CacheMetrics;
pub use setup::{detached_handle, init_metrics};
pub use upstream::record_upstream_fetch;
