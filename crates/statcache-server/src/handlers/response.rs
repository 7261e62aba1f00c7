use serde::Serialize;
use statcache_core::{DerivedStats, TrailingPeriodStats};

/// Body de `GET /player/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStatsResponse {
    /// Nombre del jugador tal como lo reporta el upstream
    pub player: String,

    /// Estadisticas de todo el historial
    pub stats: DerivedStats,

    /// Ganancias desde el ultimo snapshot, null si no hay snapshot
    pub last_30_days: Option<TrailingPeriodStats>,
}
