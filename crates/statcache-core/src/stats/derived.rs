use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::aggregate::{safe_divide, sum_excluding};
use crate::raw::RawStats;

/// Elimination sub-types decomposed out of the kill and death counters.
pub const ELIMINATION_PREFIXES: [&str; 5] = ["void_", "attack_", "magic_", "fall_", "underworld_"];

/// Marker for final kills/deaths, counted separately from regular ones.
pub const FINAL_PREFIX: &str = "final_";

/// All-time Bedwars statistics derived from raw counters.
///
/// Field names match the JSON served to clients and the snapshot files read
/// for trailing-period stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
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
    pub level: i64,
}

impl DerivedStats {
    /// Computes derived stats from a flat Bedwars counter map.
    ///
    /// `level` is passed through unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use statcache_core::DerivedStats;
    /// use serde_json::json;
    ///
    /// let counters = json!({
    ///     "final_kills_bedwars": 50,
    ///     "final_deaths_bedwars": 10,
    ///     "wins_bedwars": 30,
    ///     "losses_bedwars": 20
    /// });
    /// let stats = DerivedStats::compute(counters.as_object().unwrap(), 20);
    ///
    /// assert_eq!(stats.fkdr, 5.0);
    /// assert_eq!(stats.winrate, 1.5);
    /// assert_eq!(stats.level, 20);
    /// ```
    pub fn compute(counters: &Map<String, Value>, level: i64) -> Self {
        let mut total_exclusions = Vec::with_capacity(ELIMINATION_PREFIXES.len() + 1);
        total_exclusions.push(FINAL_PREFIX);
        total_exclusions.extend(ELIMINATION_PREFIXES);

        let final_kills = sum_excluding(counters, "final_kills_bedwars", &ELIMINATION_PREFIXES);
        let final_deaths = sum_excluding(counters, "final_deaths_bedwars", &ELIMINATION_PREFIXES);
        let kills = sum_excluding(counters, "kills_bedwars", &total_exclusions);
        let deaths = sum_excluding(counters, "deaths_bedwars", &total_exclusions);
        let games_played = sum_excluding(counters, "games_played_bedwars", &[]);
        let wins = sum_excluding(counters, "wins_bedwars", &[]);
        // Upstream reports losses under both spellings.
        let losses = sum_excluding(counters, "losses_bedwars", &[])
            + sum_excluding(counters, "lossesbedwars", &[]);

        Self {
            final_kills,
            final_deaths,
            fkdr: safe_divide(final_kills as f64, final_deaths as f64),
            kills,
            deaths,
            kdr: safe_divide(kills as f64, deaths as f64),
            wins,
            losses,
            games_played,
            winrate: safe_divide(wins as f64, losses as f64),
            level,
        }
    }

    /// Computes derived stats straight from an upstream document, using its
    /// Bedwars counters and level.
    pub fn from_raw(raw: &RawStats) -> Self {
        Self::compute(&raw.bedwars_counters(), raw.bedwars_level())
    }
}
