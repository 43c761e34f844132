use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::routes::AppState;

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe
///
/// Checks database connectivity when a database is bound; log-only
/// deployments are always ready.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let Some(pool) = &state.pool else {
        return (StatusCode::OK, Json(json!({"status": "ready"})));
    };

    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(json!({"status": "ready"}))),
        Err(e) => {
            tracing::error!("Readiness check failed: database unavailable - {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "reason": "database_unavailable"
                })),
            )
        }
    }
}
