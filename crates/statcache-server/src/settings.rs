//! Server settings.
//!
//! Precedence, lowest first: built-in defaults, the optional settings file
//! (`STATCACHE_CONFIG`, else `statcache.toml` in the working directory), and
//! `STATCACHE__<SECTION>__<KEY>` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use statcache_sources::{DEFAULT_SESSION_URL, UpstreamConfig, UpstreamError};
use thiserror::Error;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "STATCACHE_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "statcache";
const ENV_PREFIX: &str = "STATCACHE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("cache directory unavailable: {0}")]
    CacheDir(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub cache: CacheSettings,
    pub identity: IdentitySettings,
    pub snapshots: SnapshotSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub api_key: String,
    /// `None` uses the public API.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: 5,
        }
    }
}

// La API key no debe aparecer en los logs.
impl std::fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Where cache records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One JSON file per key under `cache.dir`.
    #[default]
    File,
    /// Process memory only; lost on restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub dir: PathBuf,
    pub ttl_seconds: u64,
    /// Entry bound for the memory backend.
    pub max_capacity: u64,
    pub single_flight: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            dir: PathBuf::from("proxy_cache"),
            ttl_seconds: 900,
            max_capacity: 10_000,
            single_flight: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    /// Enables `?uuid=` lookups.
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_SESSION_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

impl IdentitySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// Directory of prior snapshots; `None` disables trailing stats.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log at debug level when `RUST_LOG` is unset.
    pub debug: bool,
}

impl Settings {
    /// Loads settings from the file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or validation fails.
    pub fn load() -> Result<Self, SettingsError> {
        let file = std::env::var(CONFIG_PATH_ENV).ok();
        let file_required = file.is_some();
        let file = file.unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&file).required(file_required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Builds and validates settings from an arbitrary source stack.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "upstream.api_key is required".to_string(),
            ));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(SettingsError::Invalid(
                "cache.ttl_seconds must be at least 1".to_string(),
            ));
        }
        // f64 representa enteros exactos hasta 2^53.
        if self.cache.ttl_seconds > (1u64 << 53) {
            return Err(SettingsError::Invalid(format!(
                "cache.ttl_seconds too large: {}",
                self.cache.ttl_seconds
            )));
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                SettingsError::Invalid(format!(
                    "bad bind address {}:{}: {}",
                    self.server.host, self.server.port, e
                ))
            })
    }

    /// Upstream client configuration.
    pub fn upstream_config(&self) -> Result<UpstreamConfig, SettingsError> {
        let mut builder = UpstreamConfig::builder()
            .api_key(&self.upstream.api_key)
            .timeout_secs(self.upstream.timeout_secs);

        if let Some(url) = &self.upstream.base_url {
            builder = builder.base_url(url);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> ConfigBuilder<DefaultState> {
        Config::builder()
            .set_override("upstream.api_key", "test-key")
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_builder(with_key()).unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.cache.dir, PathBuf::from("proxy_cache"));
        assert_eq!(settings.cache.ttl_seconds, 900);
        assert_eq!(settings.cache.backend, CacheBackend::File);
        assert!(settings.cache.single_flight);
        assert!(settings.identity.enabled);
        assert!(settings.snapshots.dir.is_none());
        assert!(!settings.logging.debug);
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let err = Settings::from_builder(Config::builder()).unwrap_err();

        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let builder = with_key().set_override("cache.ttl_seconds", 0).unwrap();

        let err = Settings::from_builder(builder).unwrap_err();
        assert!(err.to_string().contains("ttl_seconds"));
    }

    #[test]
    fn test_overrides() {
        let builder = with_key()
            .set_override("server.port", 9001)
            .unwrap()
            .set_override("cache.backend", "memory")
            .unwrap()
            .set_override("snapshots.dir", "/var/lib/snapshots")
            .unwrap()
            .set_override("upstream.base_url", "http://localhost:9999")
            .unwrap();

        let settings = Settings::from_builder(builder).unwrap();

        assert_eq!(settings.server.port, 9001);
        assert_eq!(settings.cache.backend, CacheBackend::Memory);
        assert_eq!(
            settings.snapshots.dir,
            Some(PathBuf::from("/var/lib/snapshots"))
        );
        assert_eq!(
            settings.upstream_config().unwrap().base_url(),
            "http://localhost:9999"
        );
    }

    #[test]
    fn test_addr() {
        let settings = Settings::from_builder(with_key()).unwrap();

        assert_eq!(settings.addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = Settings::from_builder(with_key()).unwrap();

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("test-key"));
    }
}
