//! Raw upstream player documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StatsError};

/// Top-level field whose presence marks a document as describing a real player.
pub const SUCCESS_MARKER: &str = "player";

/// Raw statistics document as returned by the upstream player endpoint.
///
/// The document is kept verbatim so it can be cached and replayed exactly;
/// accessors only borrow into it.
///
/// # Example
///
/// ```
/// use statcache_core::RawStats;
/// use serde_json::json;
///
/// let raw = RawStats::new(json!({"success": true, "player": {"displayname": "Alice"}}));
/// assert!(raw.has_success_marker());
///
/// let unknown = RawStats::new(json!({"success": true, "player": null}));
/// assert!(!unknown.has_success_marker());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStats(Value);

impl RawStats {
    /// Wraps an upstream JSON document.
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// Parses a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map(Self)
            .map_err(|e| StatsError::parse_error_with_cause("json", "invalid JSON document", e))
    }

    /// Returns true if the document carries a non-null `player` field.
    pub fn has_success_marker(&self) -> bool {
        self.0
            .get(SUCCESS_MARKER)
            .is_some_and(|player| !player.is_null())
    }

    /// Returns the `success` flag reported upstream, if present.
    pub fn upstream_success(&self) -> Option<bool> {
        self.0.get("success").and_then(Value::as_bool)
    }

    /// Returns the `cause` reported upstream alongside `success: false`.
    pub fn upstream_cause(&self) -> Option<&str> {
        self.0.get("cause").and_then(Value::as_str)
    }

    /// Returns the player object.
    pub fn player(&self) -> Result<&Map<String, Value>> {
        self.0
            .get(SUCCESS_MARKER)
            .and_then(Value::as_object)
            .ok_or_else(|| StatsError::missing_section(SUCCESS_MARKER))
    }

    /// Returns the player's display name, if the document has one.
    pub fn display_name(&self) -> Option<&str> {
        self.player()
            .ok()
            .and_then(|p| p.get("displayname"))
            .and_then(Value::as_str)
    }

    /// Returns the flat Bedwars counter map.
    ///
    /// Looks under `player.stats.Bedwars` first and falls back to a top-level
    /// `stats.Bedwars`. A player who never played yields an empty map.
    pub fn bedwars_counters(&self) -> Map<String, Value> {
        let nested = self
            .0
            .get(SUCCESS_MARKER)
            .and_then(|p| p.get("stats"))
            .and_then(|s| s.get("Bedwars"))
            .and_then(Value::as_object);
        let top_level = self
            .0
            .get("stats")
            .and_then(|s| s.get("Bedwars"))
            .and_then(Value::as_object);

        nested.or(top_level).cloned().unwrap_or_default()
    }

    /// Returns the Bedwars star level from `player.achievements.bedwars_level`.
    pub fn bedwars_level(&self) -> i64 {
        self.0
            .get(SUCCESS_MARKER)
            .and_then(|p| p.get("achievements"))
            .and_then(|a| a.get("bedwars_level"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Borrows the underlying document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the wrapper and returns the document.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for RawStats {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
