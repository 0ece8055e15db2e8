//! Job record types - the state a poller observes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job execution status
///
/// `Processing` is the only non-terminal state. There is no paused,
/// cancelled, or retrying state visible to pollers - a stage retry, if one is
/// ever configured, happens inside the stage's processing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Complete,
    Failed,
}

impl JobStatus {
    /// Terminal statuses never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

/// Fine-grained progress, updated only while the job is processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    /// Index of the stage currently running. Non-decreasing for the life of
    /// the job and bounded by `total_steps`.
    pub current_step_index: u32,
    pub total_steps: u32,
    pub step_label: String,
    pub estimated_seconds_remaining: u64,
}

/// One generation job, keyed by id in the job store.
///
/// Exactly one of `result`/`error` is present once the job is terminal;
/// neither is set while processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub progress: JobProgress,
    pub result: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    /// Initial record written synchronously by the launcher, so an immediate
    /// poll never observes NotFound for a job the caller was just handed.
    pub fn processing(id: Uuid, total_steps: u32, estimated_seconds_remaining: u64) -> Self {
        Self {
            id,
            status: JobStatus::Processing,
            progress: JobProgress {
                current_step_index: 0,
                total_steps,
                step_label: "starting".to_string(),
                estimated_seconds_remaining,
            },
            result: None,
            error: None,
            created_at: Utc::now(),
        }
    }
}
