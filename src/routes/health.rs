use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{AppState, database, error::Result};

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Ready once the catalog database answers.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse> {
    if let Err(e) = database::check_health(&state.db).await {
        tracing::warn!("Readiness check failed: {}", e);
        return Err(e);
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "database": "connected"
        })),
    ))
}
