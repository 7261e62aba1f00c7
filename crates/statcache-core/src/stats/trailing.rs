use serde::{Deserialize, Serialize};

use super::aggregate::safe_divide;
use super::derived::DerivedStats;

/// Statistics gained over a trailing window, computed as the difference
/// between the current all-time view and a snapshot taken at the window start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailingPeriodStats {
    pub final_kills: i64,
    pub final_deaths: i64,
    pub fkdr: f64,
    pub kills: i64,
    pub deaths: i64,
    pub kdr: f64,
    pub wins: i64,
    pub losses: i64,
    pub games_played: i64,
    pub winrate: f64,
    pub levels_gained: i64,
}

impl TrailingPeriodStats {
    /// Subtracts `prior` from `current` field by field.
    ///
    /// Ratios are recomputed from the subtracted totals, never by subtracting
    /// ratios.
    ///
    /// # Example
    ///
    /// ```
    /// use statcache_core::{DerivedStats, TrailingPeriodStats};
    /// use serde_json::json;
    ///
    /// let now = DerivedStats::compute(
    ///     json!({"wins_bedwars": 40, "losses_bedwars": 25}).as_object().unwrap(),
    ///     22,
    /// );
    /// let before = DerivedStats::compute(
    ///     json!({"wins_bedwars": 30, "losses_bedwars": 20}).as_object().unwrap(),
    ///     20,
    /// );
    ///
    /// let month = TrailingPeriodStats::compute(&now, &before, 22);
    /// assert_eq!(month.wins, 10);
    /// assert_eq!(month.winrate, 2.0);
    /// assert_eq!(month.levels_gained, 2);
    /// ```
    pub fn compute(current: &DerivedStats, prior: &DerivedStats, current_level: i64) -> Self {
        let final_kills = current.final_kills - prior.final_kills;
        let final_deaths = current.final_deaths - prior.final_deaths;
        let kills = current.kills - prior.kills;
        let deaths = current.deaths - prior.deaths;
        let wins = current.wins - prior.wins;
        let losses = current.losses - prior.losses;

        Self {
            final_kills,
            final_deaths,
            fkdr: safe_divide(final_kills as f64, final_deaths as f64),
            kills,
            deaths,
            kdr: safe_divide(kills as f64, deaths as f64),
            wins,
            losses,
            games_played: current.games_played - prior.games_played,
            winrate: safe_divide(wins as f64, losses as f64),
            levels_gained: current_level - prior.level,
        }
    }
}
