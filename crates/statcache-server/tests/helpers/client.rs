//! Test client helpers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use statcache_server::{
    AppState, create_router_with_state,
    cache::{CacheConfig, CacheStore, ExpiringCache, MemoryStore},
    gateway::{GatewayConfig, StatsGateway},
    metrics::detached_handle,
};
use tower::ServiceExt;

use super::fixtures::FakeUpstream;

/// Helper para tests de integracion HTTP.
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    /// Hace un GET request.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(
            Request::builder()
                .uri(uri)
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Hace un GET request con headers personalizados.
    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        let mut builder = Request::builder().uri(uri).method("GET");

        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        self.request(builder.body(Body::empty()).unwrap()).await
    }

    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        TestResponse::from_response(response).await
    }
}

/// Wrapper sobre Response con helpers para assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Body is not valid UTF-8")
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Expected header '{}' to exist",
            name
        );
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let value = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));

        assert_eq!(
            value, expected,
            "Expected header '{}' to be '{}' but got '{}'",
            name, expected, value
        );
        self
    }

    /// Verifica el cuerpo `{error, message}` de una respuesta de error.
    pub fn assert_error_body(&self, error: &str) -> &Self {
        let body = self.json();
        assert_eq!(body["error"], error, "Unexpected error body: {}", body);
        assert!(body["message"].is_string(), "Missing message: {}", body);
        self
    }
}

/// Estado sobre un store y upstream dados.
pub fn state_with(store: Arc<dyn CacheStore>, upstream: Arc<FakeUpstream>) -> AppState {
    let cache = ExpiringCache::new(store, CacheConfig::default());
    let gateway = StatsGateway::new(cache, upstream, GatewayConfig::default());
    AppState::new(Arc::new(gateway))
}

/// Cliente sobre un router completo.
pub fn client_for(state: AppState) -> TestClient {
    TestClient::new(create_router_with_state(state, detached_handle()))
}

/// Cliente con cache en memoria sobre `upstream`.
pub fn player_client(upstream: Arc<FakeUpstream>) -> TestClient {
    client_for(state_with(Arc::new(MemoryStore::default()), upstream))
}

/// Crea un TestClient con el router de solo health.
pub fn client() -> TestClient {
    TestClient::new(statcache_server::create_router())
}
