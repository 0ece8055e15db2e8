//! Story service - the public entry points the routes call.
//!
//! `start_story` validates, registers the job synchronously, and hands the
//! pipeline to a detached task; it never waits for a stage. `story_status`
//! is a pure read-through to the job store.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::kernel::jobs::{JobRecord, JobStore, JobStoreError};
use crate::kernel::ServerDeps;

use super::assembler::assemble_artifact;
use super::orchestrator::PipelineOrchestrator;
use super::stages::StageContext;

/// Launch request body.
#[derive(Debug, Clone, Deserialize)]
pub struct StartStoryRequest {
    pub input: String,
}

/// Errors surfaced synchronously to the caller. Stage failures are not
/// here - they surface asynchronously through the job's error field.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("{0}")]
    Validation(String),
    #[error("story job {0} not found")]
    NotFound(Uuid),
    #[error("job store error: {0}")]
    Internal(#[from] JobStoreError),
}

/// Validate a request and launch its generation job.
///
/// The initial record is written before this returns, so an immediate poll
/// never observes NotFound for the id the caller was just handed. With zero
/// configured stages the job completes here, synchronously, with the
/// assembler's empty-input artifact - never an error.
pub async fn start_story(
    deps: &ServerDeps,
    request: StartStoryRequest,
) -> Result<Uuid, StoryError> {
    validate_input(&request.input, deps.min_input_len, deps.max_input_len)?;

    let job_id = Uuid::new_v4();
    let total_steps = deps.stages.len() as u32;
    let estimate: u64 = deps
        .stages
        .iter()
        .map(|s| s.estimated_duration_secs)
        .sum();

    deps.jobs
        .create(JobRecord::processing(job_id, total_steps, estimate))
        .await?;

    if deps.stages.is_empty() {
        let context = StageContext::new(request.input);
        let artifact = assemble_artifact(&context.summary, &[]);
        deps.jobs.complete(job_id, artifact).await?;
        info!(job_id = %job_id, "zero-stage pipeline completed immediately");
        return Ok(job_id);
    }

    let orchestrator = PipelineOrchestrator::new(
        deps.jobs.clone(),
        deps.generator.clone(),
        deps.stages.clone(),
        deps.orchestrator.clone(),
    );
    tokio::spawn(orchestrator.run(job_id, request.input));

    info!(job_id = %job_id, total_stages = total_steps, "story job launched");
    Ok(job_id)
}

/// Current record for a job, verbatim from the store.
pub async fn story_status(deps: &ServerDeps, job_id: Uuid) -> Result<JobRecord, StoryError> {
    match deps.jobs.get(job_id).await {
        Ok(record) => Ok(record),
        Err(JobStoreError::NotFound(id)) => Err(StoryError::NotFound(id)),
        Err(e) => Err(StoryError::Internal(e)),
    }
}

/// Where a completed job's artifact can be fetched. Derived from the id,
/// never stored.
pub fn artifact_location(job_id: Uuid) -> String {
    format!("/api/stories/{}/artifact", job_id)
}

fn validate_input(input: &str, min: usize, max: usize) -> Result<(), StoryError> {
    if input.trim().is_empty() {
        return Err(StoryError::Validation("input is required".to_string()));
    }

    let length = input.chars().count();
    if length < min {
        return Err(StoryError::Validation(format!(
            "input must be at least {} characters",
            min
        )));
    }
    if length > max {
        return Err(StoryError::Validation(format!(
            "input must be at most {} characters",
            max
        )));
    }

    Ok(())
}
