//! Upstream client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.hypixel.net";

/// Configuration for the HTTP statistics source.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamConfig {
    /// Base URL of the statistics API.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// API key sent as the `key` query parameter.
    api_key: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("statcache/{}", env!("CARGO_PKG_VERSION"))
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl UpstreamConfig {
    /// Creates a new builder for UpstreamConfig.
    pub fn builder() -> UpstreamConfigBuilder {
        UpstreamConfigBuilder::default()
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the request timeout in whole seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Returns the User-Agent header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the player endpoint URL.
    pub fn player_url(&self) -> String {
        format!("{}/player", self.base_url())
    }
}

/// Builder for UpstreamConfig.
#[derive(Debug, Default)]
pub struct UpstreamConfigBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl UpstreamConfigBuilder {
    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or blank, the base URL is
    /// not http(s), or the timeout is zero.
    pub fn build(self) -> Result<UpstreamConfig, UpstreamError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| UpstreamError::InvalidConfig("API key is required".to_string()))?;

        let base_url = self.base_url.unwrap_or_else(default_base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(UpstreamError::InvalidConfig(format!(
                "base URL must be http(s): {}",
                base_url
            )));
        }

        let timeout_secs = self.timeout_secs.unwrap_or_else(default_timeout_secs);
        if timeout_secs == 0 {
            return Err(UpstreamError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }

        Ok(UpstreamConfig {
            base_url,
            api_key,
            timeout_secs,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        })
    }
}
