//! REST API endpoints.
//!
//! Axum-based HTTP API serving the aggregate reports, player management,
//! and the HTML index page.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::FieldErrors;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // Internal details go to the log, not the client.
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            ApiError::NotFound(what) => what.clone(),
            other => other.to_string(),
        };

        let fields = match self {
            ApiError::Validation(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidKey { field, value } => {
                let mut fields = FieldErrors::new();
                fields.add(field, format!("Cannot derive a key from '{}'.", value));
                ApiError::Validation(fields)
            }
            StorageError::Database(e) => e.into(),
        }
    }
}

/// Register `path` both with and without its trailing slash.
fn route_both(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    let bare = path.trim_end_matches('/');
    router.route(path, method_router.clone()).route(bare, method_router)
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let api = [
        ("/api/tournaments/", get(routes::reports::tournaments)),
        ("/api/players/", get(routes::reports::players_per_letter)),
        (
            "/api/players/by-letter/:letter/",
            get(routes::reports::players_by_letter),
        ),
        ("/api/years/", get(routes::reports::years)),
        ("/api/players/most-aces/", get(routes::reports::most_aces)),
        (
            "/api/countries/most-wins/",
            get(routes::reports::countries_with_most_wins),
        ),
        (
            "/api/performance-by-hand/",
            get(routes::reports::performance_by_hand),
        ),
        ("/api/manage-player/", post(routes::players::create_player)),
        (
            "/api/manage-player/:player_id/",
            delete(routes::players::delete_player),
        ),
        (
            "/api/update-player/:player_id/",
            put(routes::players::update_player).patch(routes::players::update_player),
        ),
    ];

    api.into_iter()
        .fold(
            Router::new().route("/", get(routes::index::index)),
            |router, (path, method_router)| route_both(router, path, method_router),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured origin. `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin '{}', allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}
