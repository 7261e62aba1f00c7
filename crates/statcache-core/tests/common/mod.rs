#![allow(dead_code)]
use statcache_core::RawStats;

/// Helper to create a RawStats from a JSON string slice.
/// Panics if the JSON is invalid (intended for tests).
pub fn raw_from_json(json: &str) -> RawStats {
    RawStats::from_json(json).expect("Failed to create test document from JSON")
}

/// Returns the reference Bedwars document used across scenario tests.
pub fn bedwars_document() -> RawStats {
    raw_from_json(
        r#"{
        "success": true,
        "player": {"displayname": "Alice"},
        "stats": {
            "Bedwars": {
                "final_kills_bedwars": 50,
                "final_deaths_bedwars": 10,
                "kills_bedwars": 200,
                "deaths_bedwars": 150,
                "wins_bedwars": 30,
                "losses_bedwars": 20,
                "games_played_bedwars": 50
            }
        }
    }"#,
    )
}
