use crate::AuthenticatedCaller;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - Unauthenticated liveness probe
pub async fn health() -> Response {
    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /health-check - Token-validated reachability check.
///
/// The governing node calls this before activating a new registration and
/// expects `{"success": true}`; a wrong key or URL fails here, not later in
/// the aggregation fan-out.
pub async fn health_check(_caller: AuthenticatedCaller) -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}
