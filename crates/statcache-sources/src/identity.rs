//! Account identifier to player name resolution.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{IdentityError, UpstreamError};

/// Default session profile service.
pub const DEFAULT_SESSION_URL: &str = "https://sessionserver.mojang.com";

/// Resolves an opaque account identifier to the player's current name.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the current name for `account_id`.
    ///
    /// # Errors
    ///
    /// - `IdentityError::UnknownAccount` if no such account exists
    /// - `IdentityError::Upstream` if the service could not be reached
    async fn resolve_name(&self, account_id: &str) -> Result<String, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct SessionProfile {
    name: String,
}

/// Resolves account ids through the session profile endpoint
/// (`GET {base_url}/session/minecraft/profile/{id}`).
pub struct SessionProfileResolver {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl SessionProfileResolver {
    /// Creates a resolver against `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::InvalidConfig(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

/// Strips dashes from a hyphenated account id and validates it is 32 hex digits.
pub fn normalize_account_id(account_id: &str) -> Option<String> {
    let compact: String = account_id
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase();

    (compact.len() == 32 && compact.chars().all(|c| c.is_ascii_hexdigit())).then_some(compact)
}

#[async_trait]
impl IdentityResolver for SessionProfileResolver {
    async fn resolve_name(&self, account_id: &str) -> Result<String, IdentityError> {
        let id = normalize_account_id(account_id)
            .ok_or_else(|| IdentityError::UnknownAccount(account_id.to_string()))?;
        let url = format!("{}/session/minecraft/profile/{}", self.base_url, id);

        debug!(account_id = %id, "Resolving account name");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        // El servicio responde 204 (o 404) para cuentas inexistentes
        if status == reqwest::StatusCode::NO_CONTENT || status == reqwest::StatusCode::NOT_FOUND {
            return Err(IdentityError::UnknownAccount(account_id.to_string()));
        }
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let profile: SessionProfile = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout))?;

        Ok(profile.name)
    }
}
