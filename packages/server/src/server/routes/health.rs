use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    pipeline_stages: usize,
}

/// Health check endpoint
///
/// The service has no external state beyond the in-memory job store, so
/// liveness plus the configured pipeline size is the whole story.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            pipeline_stages: state.deps.stages.len(),
        }),
    )
}
