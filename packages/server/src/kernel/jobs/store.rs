//! Job store trait and in-memory implementation.
//!
//! The store is the only shared mutable state between the orchestrator and
//! concurrent status readers. `update` applies its mutation atomically with
//! respect to readers of the same id, and distinct ids never contend on a
//! single global lock (DashMap shards by key).
//!
//! The trait exists so a persistent implementation can replace
//! [`InMemoryJobStore`] without touching the orchestrator; `JobRecord` is
//! the serialization contract such a store must preserve.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::record::{JobProgress, JobRecord, JobStatus};

/// Store-level errors. Unknown ids are surfaced, never defaulted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobStoreError {
    #[error("job {0} not found")]
    NotFound(Uuid),
    #[error("job {0} already exists")]
    AlreadyExists(Uuid),
}

/// Mutation applied atomically to one record by [`JobStore::update`].
pub type Mutator = Box<dyn FnOnce(&mut JobRecord) + Send>;

/// Registry of generation jobs, keyed by id.
///
/// The guarded transition helpers (`set_progress`, `complete`, `fail`)
/// enforce the state machine uniformly across implementations: terminal
/// statuses are final, progress is monotonic, and a second terminal
/// transition is a no-op rather than an error.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Register a new job. Ids are never reused; a duplicate is an error.
    async fn create(&self, record: JobRecord) -> Result<(), JobStoreError>;

    /// Current record for `id`, or NotFound.
    async fn get(&self, id: Uuid) -> Result<JobRecord, JobStoreError>;

    /// Apply `mutate` atomically and return the updated record. Readers
    /// never observe a partially-applied mutation.
    async fn update(&self, id: Uuid, mutate: Mutator) -> Result<JobRecord, JobStoreError>;

    /// Record progress for a processing job. Ignored once the job is
    /// terminal, and never moves `current_step_index` backwards.
    async fn set_progress(
        &self,
        id: Uuid,
        progress: JobProgress,
    ) -> Result<JobRecord, JobStoreError> {
        self.update(
            id,
            Box::new(move |record| {
                if record.status.is_terminal() {
                    return;
                }
                if progress.current_step_index >= record.progress.current_step_index {
                    record.progress = progress;
                }
            }),
        )
        .await
    }

    /// Terminal transition to `Complete` with the assembled artifact.
    /// A no-op if the job is already terminal.
    async fn complete(&self, id: Uuid, artifact: String) -> Result<JobRecord, JobStoreError> {
        self.update(
            id,
            Box::new(move |record| {
                if record.status.is_terminal() {
                    return;
                }
                record.status = JobStatus::Complete;
                record.result = Some(artifact);
                record.error = None;
                record.progress.current_step_index = record.progress.total_steps;
                record.progress.estimated_seconds_remaining = 0;
                record.progress.step_label = "done".to_string();
            }),
        )
        .await
    }

    /// Terminal transition to `Failed` with a human-readable summary.
    /// A no-op if the job is already terminal.
    async fn fail(&self, id: Uuid, error: String) -> Result<JobRecord, JobStoreError> {
        self.update(
            id,
            Box::new(move |record| {
                if record.status.is_terminal() {
                    return;
                }
                record.status = JobStatus::Failed;
                record.error = Some(error);
                record.result = None;
                record.progress.estimated_seconds_remaining = 0;
                record.progress.step_label = "failed".to_string();
            }),
        )
        .await
    }
}

/// In-process job store backed by a sharded concurrent map.
///
/// Flagged in the design as the placeholder for a real database: swap it
/// behind [`JobStore`] when multi-instance deployment needs persistence.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<Uuid, JobRecord>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, record: JobRecord) -> Result<(), JobStoreError> {
        match self.jobs.entry(record.id) {
            Entry::Occupied(_) => Err(JobStoreError::AlreadyExists(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<JobRecord, JobStoreError> {
        self.jobs
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(JobStoreError::NotFound(id))
    }

    async fn update(&self, id: Uuid, mutate: Mutator) -> Result<JobRecord, JobStoreError> {
        let mut entry = self.jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;
        mutate(entry.value_mut());
        Ok(entry.clone())
    }
}
