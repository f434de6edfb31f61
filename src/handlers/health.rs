use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// Liveness probe that also pings the database
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match crate::db::check_connection(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"status": "healthy", "database": "healthy"})),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "unhealthy", "database": "unhealthy"})),
        ),
    }
}
