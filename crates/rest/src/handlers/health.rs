//! Health check endpoint handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hub_persistence::core::Storage;
use tracing::debug;

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /health`
///
/// # Response
///
/// - `200 OK` - `{"status": "healthy", "backend": ..., "version": ..., "timestamp": ...}`
pub async fn health_handler<S: Storage>(State(state): State<AppState<S>>) -> Response {
    debug!("Processing health check request");

    let body = serde_json::json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(body)).into_response()
}
