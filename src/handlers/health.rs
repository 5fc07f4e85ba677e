//! Health endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;
use crate::{NAME, VERSION};

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let status = state.services.health_check().await;

    if status.is_healthy() {
        return (
            StatusCode::OK,
            Json(json!({ "status": "ok", "name": NAME, "version": VERSION })),
        );
    }

    let issues = status.get_issues();
    warn!(issues = ?issues, "Health check failed");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "unavailable",
            "name": NAME,
            "version": VERSION,
            "issues": issues,
        })),
    )
}
