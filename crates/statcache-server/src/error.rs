use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use statcache_sources::IdentityError;

use crate::gateway::LookupError;

#[derive(Debug)]
pub enum AppError {
    /// Parametros invalidos
    BadRequest(String),

    /// Jugador inexistente
    PlayerNotFound(String),

    /// Upstream caido o con error
    BadGateway(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidPlayer { player } => AppError::PlayerNotFound(player),
            LookupError::UpstreamUnavailable(e) => AppError::BadGateway(e.to_string()),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::UnknownAccount(id) => AppError::PlayerNotFound(id),
            IdentityError::Upstream(e) => AppError::BadGateway(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            AppError::PlayerNotFound(player) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("Invalid player was entered: {}", player),
            ),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "Bad Gateway", msg),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
