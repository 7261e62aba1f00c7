//! Player endpoint handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, header::HeaderName},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use statcache_core::{DerivedStats, TrailingPeriodStats};
use tracing::{debug, instrument, warn};

use crate::error::AppError;
use crate::extractors::{PlayerIdentifier, PlayerQuery};
use crate::gateway::PlayerData;
use crate::handlers::response::PlayerStatsResponse;
use crate::state::AppState;

/// Response header reporting whether the document came from cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Handler for GET /player.
///
/// Returns the upstream document unchanged.
#[instrument(skip_all, fields(username = ?query.username, uuid = ?query.uuid))]
pub async fn get_player(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> Result<Response, AppError> {
    let data = lookup(&state, &query).await?;
    let outcome = data.outcome;

    let mut response = Json::<Value>(data.raw.into_value()).into_response();
    response.headers_mut().insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static(outcome.as_header_value()),
    );

    Ok(response)
}

/// Handler for GET /player/stats.
#[instrument(skip_all, fields(username = ?query.username, uuid = ?query.uuid))]
pub async fn get_player_stats(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> Result<Response, AppError> {
    let data = lookup(&state, &query).await?;
    let outcome = data.outcome;

    let stats = DerivedStats::from_raw(&data.raw);
    let last_30_days = trailing(&state, &data, &stats).await;

    let body = PlayerStatsResponse {
        player: data
            .raw
            .display_name()
            .unwrap_or(data.key.as_str())
            .to_string(),
        stats,
        last_30_days,
    };

    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static(outcome.as_header_value()),
    );

    Ok(response)
}

/// Resolves the query to a player name and goes through the gateway.
async fn lookup(state: &AppState, query: &PlayerQuery) -> Result<PlayerData, AppError> {
    let name = match query.identifier() {
        Some(PlayerIdentifier::Name(name)) => name,
        Some(PlayerIdentifier::AccountId(id)) => {
            let resolver = state.identity().ok_or_else(|| {
                AppError::BadRequest("Lookup by uuid is disabled".to_string())
            })?;
            let name = resolver.resolve_name(&id).await?;
            debug!(account_id = %id, player = %name, "Resolved account id");
            name
        },
        None => {
            return Err(AppError::BadRequest(
                "Missing username or uuid parameter".to_string(),
            ));
        },
    };

    Ok(state.gateway().get_player_data(&name).await?)
}

/// Trailing-period stats, or `None` when no usable snapshot exists.
async fn trailing(
    state: &AppState,
    data: &PlayerData,
    current: &DerivedStats,
) -> Option<TrailingPeriodStats> {
    match state.snapshots().prior_snapshot(data.key.as_str()).await {
        Ok(Some(prior)) => Some(TrailingPeriodStats::compute(current, &prior, current.level)),
        Ok(None) => None,
        Err(e) => {
            // Un snapshot roto no debe tumbar la respuesta principal.
            warn!(player = %data.key, error = %e, "Failed to read prior snapshot");
            None
        },
    }
}
