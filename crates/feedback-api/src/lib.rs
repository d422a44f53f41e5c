//! # feedback-api
//!
//! HTTP API server for the transit feedback service.
//!
//! The router and handlers live in this library crate so integration
//! tests can drive the service in-process; `main.rs` is a thin binary
//! that wires configuration, logging, and the database.

pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::error;

use feedback_db::Database;

/// Maximum accepted request/attachment size (5 MB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Fixed client-facing message for oversized requests.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "File too large. Maximum size is 5MB.";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Build the application router with all routes and middleware.
pub fn app(db: Database) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/feedback",
            post(handlers::feedback::submit_feedback).get(handlers::feedback::list_feedback),
        )
        .route(
            "/api/feedback/:id/status",
            put(handlers::feedback::update_feedback_status),
        )
        .route("/api/ticket/:feedback_id", get(handlers::tickets::get_ticket))
        .route("/api/stats", get(handlers::reports::get_stats))
        .route("/api/hotspots", get(handlers::reports::get_hotspots))
        .route(
            "/api/analytics/routes",
            get(handlers::reports::get_route_analytics),
        )
        .route("/api/export/csv", get(handlers::reports::export_csv))
        .route("/api/files/stats", get(handlers::reports::get_file_stats))
        .fallback(endpoint_not_found)
        .layer(axum::middleware::map_response(payload_too_large_shape))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .with_state(AppState { db })
}

/// Fallback for unmatched routes.
async fn endpoint_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Endpoint not found" })),
    )
}

/// Rewrite bare 413 responses (emitted by the body-limit layers) into the
/// service's JSON error shape with its fixed message.
async fn payload_too_large_shape(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(serde_json::json!({ "error": PAYLOAD_TOO_LARGE_MESSAGE })),
        )
            .into_response();
    }
    response
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// Handler-level error, converted to a JSON response at the boundary.
#[derive(Debug)]
pub enum ApiError {
    /// Unexpected failure; logged server-side, generic message to caller.
    Internal(feedback_core::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<feedback_core::Error> for ApiError {
    fn from(err: feedback_core::Error) -> Self {
        match err {
            feedback_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            feedback_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({ "error": message }));
        (status, body).into_response()
    }
}
