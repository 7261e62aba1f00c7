//! HTTP statistics source.

use async_trait::async_trait;
use statcache_core::RawStats;
use tracing::{debug, warn};

use super::{StatsSource, UpstreamConfig};
use crate::error::UpstreamError;

/// Fetches player documents from the upstream HTTP API.
///
/// Issues `GET {base_url}/player?key=<api key>&name=<player>`.
pub struct HttpStatsSource {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpStatsSource {
    /// Creates a new source with its own connection pool.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| UpstreamError::InvalidConfig(format!("HTTP client error: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Returns the source configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch(&self, player: &str) -> Result<RawStats, UpstreamError> {
        let timeout = self.config.timeout();

        debug!(player = %player, "Requesting player document");

        let response = self
            .client
            .get(self.config.player_url())
            .query(&[("key", self.config.api_key()), ("name", player)])
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            warn!(player = %player, status = status.as_u16(), "Upstream returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let document: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout))?;
        let raw = RawStats::new(document);

        if raw.upstream_success() == Some(false) {
            let cause = raw.upstream_cause().unwrap_or("Unknown error");
            return Err(UpstreamError::rejected(cause));
        }

        Ok(raw)
    }

    fn name(&self) -> &str {
        "http"
    }
}
