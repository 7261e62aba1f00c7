//! Upstream fetch metrics.

use metrics::{counter, histogram};
use std::time::Duration;

/// Registra las metricas del upstream.
pub fn register_upstream_metrics() {
    metrics::describe_counter!(
        "statcache_upstream_requests_total",
        "Upstream fetches by outcome (ok, invalid_player, error, timeout)"
    );
    metrics::describe_histogram!(
        "statcache_upstream_request_seconds",
        "Upstream fetch latency in seconds"
    );
}

/// Registra un fetch al upstream con su resultado.
pub fn record_upstream_fetch(source: &str, outcome: &'static str, duration: Duration) {
    counter!(
        "statcache_upstream_requests_total",
        "source" => source.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        "statcache_upstream_request_seconds",
        "source" => source.to_string()
    )
    .record(duration.as_secs_f64());
}
