//! Story generation domain.
//!
//! One "story" job drives a fixed, ordered stage pipeline against the
//! generation capability and assembles the stage outputs into a single
//! markdown artifact.
//!
//! # Architecture
//!
//! ```text
//! service::start_story (validate, create record)
//!     │
//!     └─► tokio::spawn(PipelineOrchestrator::run)
//!             ├─► StageRunner (one generation call per stage)
//!             ├─► JobStore (progress updates between stages)
//!             └─► assemble_artifact + terminal transition
//!
//! service::story_status reads only from the JobStore - it never blocks on
//! the orchestrator.
//! ```

pub mod assembler;
pub mod orchestrator;
pub mod runner;
pub mod service;
pub mod stages;

pub use assembler::assemble_artifact;
pub use orchestrator::{OrchestratorConfig, PipelineOrchestrator};
pub use runner::{StageFailure, StageRunner};
pub use service::{
    artifact_location, start_story, story_status, StartStoryRequest, StoryError,
};
pub use stages::{default_pipeline, StageContext, StageDefinition};
