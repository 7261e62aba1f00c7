//! Colaboradores falsos y documentos de prueba.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use statcache_core::RawStats;
use statcache_sources::{IdentityError, IdentityResolver, StatsSource, UpstreamError};

/// Upstream en memoria: responde segun el nombre y cuenta las llamadas.
///
/// - nombres registrados con `with_player` devuelven su documento
/// - `"offline"` simula un upstream caido
/// - `"throttled"` simula un `success:false`
/// - cualquier otro nombre devuelve `player: null`
#[derive(Default)]
pub struct FakeUpstream {
    players: HashMap<String, Value>,
    calls: AtomicU32,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, name: &str, document: Value) -> Self {
        self.players.insert(name.to_lowercase(), document);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsSource for FakeUpstream {
    async fn fetch(&self, player: &str) -> Result<RawStats, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match player {
            "offline" => Err(UpstreamError::unavailable("connection refused")),
            "throttled" => Err(UpstreamError::rejected("Key throttle")),
            name => Ok(RawStats::new(
                self.players
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| json!({"success": true, "player": null})),
            )),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Resolver con un mapa fijo de ids a nombres.
#[derive(Default)]
pub struct FixedResolver {
    names: HashMap<String, String>,
}

impl FixedResolver {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            names: entries
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityResolver for FixedResolver {
    async fn resolve_name(&self, account_id: &str) -> Result<String, IdentityError> {
        self.names
            .get(account_id)
            .cloned()
            .ok_or_else(|| IdentityError::UnknownAccount(account_id.to_string()))
    }
}

/// Documento Bedwars de referencia con contadores en `player.stats`.
pub fn bedwars_document(name: &str) -> Value {
    json!({
        "success": true,
        "player": {
            "displayname": name,
            "achievements": {"bedwars_level": 20},
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
        }
    })
}
