//! Story generation routes.
//!
//! Two public operations: launch a job and poll its status. The artifact
//! route serves the derived artifact location exposed on completed jobs.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domains::stories::{artifact_location, service, StartStoryRequest, StoryError};
use crate::kernel::jobs::{JobProgress, JobRecord, JobStatus};
use crate::server::app::AppState;

// =============================================================================
// API error mapping
// =============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(String),
}

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::Validation(msg) => ApiError::BadRequest(msg),
            StoryError::NotFound(id) => {
                ApiError::NotFound(format!("story job {} not found", id))
            }
            StoryError::Internal(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize)]
pub struct StartStoryResponse {
    pub job_id: Uuid,
}

/// The job record as a poller sees it. `artifact_location` is derived from
/// the id on completion, never stored.
#[derive(Serialize)]
pub struct StoryStatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: JobProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<JobRecord> for StoryStatusResponse {
    fn from(record: JobRecord) -> Self {
        let location =
            (record.status == JobStatus::Complete).then(|| artifact_location(record.id));
        Self {
            job_id: record.id,
            status: record.status,
            progress: record.progress,
            result: record.result,
            error: record.error,
            artifact_location: location,
            created_at: record.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/stories
/// Validate the request and launch a generation job. Returns immediately
/// with the job id - the pipeline runs in the background.
///
/// A body that fails to deserialize (missing or mistyped `input`) is a
/// validation error like any other: 400 with the error envelope, not the
/// extractor's default rejection.
pub async fn start_story_handler(
    State(state): State<AppState>,
    request: Result<Json<StartStoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StartStoryResponse>), ApiError> {
    let Json(request) = request.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let job_id = service::start_story(&state.deps, request).await?;
    Ok((StatusCode::CREATED, Json(StartStoryResponse { job_id })))
}

/// GET /api/stories/{id}/status
/// Current job record, straight from the store. Never blocks on the
/// orchestrator.
pub async fn story_status_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoryStatusResponse>, ApiError> {
    let record = service::story_status(&state.deps, id).await?;
    Ok(Json(record.into()))
}

/// GET /api/stories/{id}/artifact
/// The assembled artifact for a completed job, as markdown.
pub async fn story_artifact_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let record = service::story_status(&state.deps, id).await?;

    match (record.status, record.result) {
        (JobStatus::Complete, Some(artifact)) => Ok((
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            artifact,
        )
            .into_response()),
        (JobStatus::Failed, _) => Err(ApiError::Conflict(format!(
            "story job {} failed and has no artifact",
            id
        ))),
        _ => Err(ApiError::Conflict(format!(
            "story job {} is still processing",
            id
        ))),
    }
}
