use serde::Deserialize;

/// Query parameters for the player endpoints.
///
/// Exactly one identifier is needed; `uuid` wins when both are present.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PlayerQuery {
    /// Player display name.
    pub username: Option<String>,

    /// Opaque account identifier, resolved to a name before lookup.
    pub uuid: Option<String>,
}

/// Which identifier the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerIdentifier {
    Name(String),
    AccountId(String),
}

impl PlayerQuery {
    /// Returns the identifier to look up, ignoring blank values.
    pub fn identifier(&self) -> Option<PlayerIdentifier> {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        non_blank(&self.uuid)
            .map(PlayerIdentifier::AccountId)
            .or_else(|| non_blank(&self.username).map(PlayerIdentifier::Name))
    }
}
