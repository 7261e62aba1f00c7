//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

use crate::handlers::player::CACHE_STATUS_HEADER;

/// Middleware que registra metricas HTTP por request.
///
/// Labels: metodo, ruta matcheada (sin query string), clase de status
/// (`2xx`, `4xx`, ...) y el valor de `x-cache` cuando el handler lo pone.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status_class = format!("{}xx", response.status().as_u16() / 100);
    let cache = response
        .headers()
        .get(CACHE_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_ascii_lowercase();

    counter!(
        "statcache_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status_class,
        "cache" => cache
    )
    .increment(1);

    histogram!(
        "statcache_http_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "statcache_http_requests_total",
        "Total number of HTTP requests"
    );
    metrics::describe_histogram!(
        "statcache_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
}
