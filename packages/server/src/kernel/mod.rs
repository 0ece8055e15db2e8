//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod jobs;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIClient;
pub use deps::ServerDeps;
pub use jobs::{
    InMemoryJobStore, JobProgress, JobRecord, JobStatus, JobStore, JobStoreError,
};
pub use test_dependencies::ScriptedGenerator;
pub use traits::BaseStoryGenerator;
