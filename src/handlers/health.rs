use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::state::AppState;

/// GET /health - Liveness plus a store round trip
pub async fn get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store().ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
