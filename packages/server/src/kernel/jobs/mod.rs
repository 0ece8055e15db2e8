//! Job infrastructure for background story generation.
//!
//! This module is the kernel-level state tracking for generation jobs:
//! - [`JobRecord`] - what a poller observes for one job
//! - [`JobStore`] - injectable registry, the sole source of truth for job state
//! - [`InMemoryJobStore`] - concurrency-safe in-process implementation
//!
//! The orchestrator is the only writer for a given job; any number of status
//! readers may poll the same id concurrently. The store is injected into both
//! at construction - nothing reaches it through a global.

mod record;
mod store;

pub use record::{JobProgress, JobRecord, JobStatus};
pub use store::{InMemoryJobStore, JobStore, JobStoreError, Mutator};
