//! Cache key normalization.

use std::fmt;

/// Key unica para el cache de jugadores.
/// Normaliza el identificador a lowercase para que "Alice" y "alice"
/// compartan la misma entrada.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Crea una nueva cache key normalizando a lowercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use statcache_server::cache::CacheKey;
    ///
    /// let key = CacheKey::new("  Alice ");
    /// assert_eq!(key.as_str(), "alice");
    /// ```
    pub fn new(player: impl AsRef<str>) -> Self {
        Self(player.as_ref().trim().to_lowercase())
    }

    /// Retorna la key normalizada.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Retorna true si la key esta vacia tras normalizar.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nombre de archivo seguro para el backend de disco.
    /// Los separadores de path quedan percent-encoded.
    pub fn file_name(&self) -> String {
        format!("{}.json", urlencoding::encode(&self.0))
    }
}

impl From<&str> for CacheKey {
    fn from(player: &str) -> Self {
        Self::new(player)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
