//! Server dependencies (using traits for testability)
//!
//! Central dependency container handed to routes and the stories service.
//! The orchestrator and the status endpoint both receive the same job store
//! through this container - state is never reached through a global.

use std::sync::Arc;
use std::time::Duration;

use crate::domains::stories::{default_pipeline, OrchestratorConfig, StageDefinition};
use crate::kernel::jobs::{InMemoryJobStore, JobStore};
use crate::kernel::traits::BaseStoryGenerator;
use crate::Config;

/// Server dependencies accessible to routes and services
#[derive(Clone)]
pub struct ServerDeps {
    /// Sole source of truth for job state.
    pub jobs: Arc<dyn JobStore>,
    /// The external generation capability.
    pub generator: Arc<dyn BaseStoryGenerator>,
    /// Ordered stage pipeline - fixed process-wide configuration.
    pub stages: Arc<Vec<StageDefinition>>,
    pub orchestrator: OrchestratorConfig,
    pub min_input_len: usize,
    pub max_input_len: usize,
}

impl ServerDeps {
    /// Create ServerDeps from application configuration.
    pub fn new(generator: Arc<dyn BaseStoryGenerator>, config: &Config) -> Self {
        Self {
            orchestrator: OrchestratorConfig {
                stage_timeout: Duration::from_secs(config.stage_timeout_secs),
                stage_pacing: Duration::from_millis(config.stage_pacing_ms),
            },
            min_input_len: config.min_input_len,
            max_input_len: config.max_input_len,
            ..Self::with_defaults(generator)
        }
    }

    /// Defaults with an injected generator. Tests build on this and override
    /// the pieces they exercise.
    pub fn with_defaults(generator: Arc<dyn BaseStoryGenerator>) -> Self {
        Self {
            jobs: Arc::new(InMemoryJobStore::new()),
            generator,
            stages: Arc::new(default_pipeline()),
            orchestrator: OrchestratorConfig::default(),
            min_input_len: 12,
            max_input_len: 20_000,
        }
    }

    /// Replace the stage pipeline (tests use short scripted pipelines).
    pub fn with_stages(mut self, stages: Vec<StageDefinition>) -> Self {
        self.stages = Arc::new(stages);
        self
    }

    /// Replace the input length bounds.
    pub fn with_input_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_input_len = min;
        self.max_input_len = max;
        self
    }

    /// Replace the orchestrator tuning knobs.
    pub fn with_orchestrator_config(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator = config;
        self
    }
}
