//! Liveness and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::AppState;

/// GET /health. Answers as long as the process serves requests.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /ready. Unlike liveness, this verifies the database answers.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    match state.repo.ping().await {
        Ok(()) => Ok(Json(serde_json::json!({"status": "ready"}))),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}
