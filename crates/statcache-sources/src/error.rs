//! Error types for upstream collaborators.

use std::time::Duration;

use statcache_core::StatsError;

/// Errors that can occur when fetching from the upstream statistics service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("upstream unavailable: {reason}")]
    Unavailable { reason: String },

    /// The upstream answered with a non-success HTTP status.
    #[error("upstream returned status {status}")]
    Status { status: u16 },

    /// The upstream answered `success: false`.
    #[error("upstream rejected request: {cause}")]
    Rejected { cause: String },

    /// The response body was not a JSON document.
    #[error("invalid upstream response: {0}")]
    Decode(String),

    /// A timeout occurred while waiting for the upstream.
    #[error("operation timed out after {after:?}")]
    Timeout { after: Duration },

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl UpstreamError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new rejected error.
    pub fn rejected(cause: impl Into<String>) -> Self {
        Self::Rejected {
            cause: cause.into(),
        }
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable { .. } | Self::Timeout { .. } => true,
            Self::Status { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Classifies a reqwest failure.
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout { after: timeout }
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else {
            Self::unavailable(error.to_string())
        }
    }
}

/// Errors from resolving an account identifier to a player name.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// No account exists for the identifier.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// The identity service could not be reached or answered badly.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Errors from loading a prior statistics snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot did not decode.
    #[error(transparent)]
    Parse(#[from] StatsError),
}
