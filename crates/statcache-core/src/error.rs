//! Error types for statcache domain operations.
//!
//! The aggregation functions themselves are total: missing or non-numeric
//! counters count as zero. Errors only arise when decoding documents into
//! domain types.
//!
//! # Example
//!
//! ```
//! use statcache_core::{RawStats, StatsError};
//!
//! let result = RawStats::from_json("{not json");
//! assert!(matches!(result, Err(StatsError::ParseError { .. })));
//! ```

use thiserror::Error;

/// Main error type for statcache domain operations.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A document could not be decoded.
    #[error("Failed to parse statistics from '{source_name}': {message}")]
    ParseError {
        /// Where the document came from (file, endpoint, ...)
        source_name: String,
        /// Description of the parse error
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A document decoded but lacks a required section.
    #[error("Missing section '{section}' in statistics document")]
    MissingSection {
        /// Dotted path of the missing section
        section: String,
    },
}

impl StatsError {
    /// Creates a ParseError without a cause.
    pub fn parse_error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            source_name: source.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a ParseError with a cause.
    pub fn parse_error_with_cause<E>(
        source: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ParseError {
            source_name: source.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a MissingSection error.
    pub fn missing_section(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }

    /// Returns true if this is a parse error.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }
}

/// Type alias for Results with StatsError.
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = StatsError::parse_error("snapshots/alice.json", "expected object");
        let msg = format!("{}", error);

        assert!(msg.contains("snapshots/alice.json"));
        assert!(msg.contains("expected object"));
        assert!(error.is_parse_error());
    }

    #[test]
    fn test_error_source_chain() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = StatsError::parse_error_with_cause("upstream", "invalid JSON", json_error);

        use std::error::Error;
        assert!(error.source().is_some());
    }

    #[test]
    fn test_missing_section() {
        let error = StatsError::missing_section("player.stats.Bedwars");

        assert!(!error.is_parse_error());
        assert!(error.to_string().contains("player.stats.Bedwars"));
    }
}
