use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub database: String,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = if state.db.ping().await.is_ok() {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Photo Gallery API is running".to_string(),
        database: db_status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
