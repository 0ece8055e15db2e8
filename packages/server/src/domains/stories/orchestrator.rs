//! Pipeline orchestrator - drives one job's stages to a terminal state.
//!
//! Runs as an independent tokio task decoupled from the request that
//! launched it. The orchestrator is the only writer of its job's record;
//! any number of pollers read it concurrently through the job store.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::kernel::jobs::{JobProgress, JobStore, JobStoreError};
use crate::kernel::BaseStoryGenerator;

use super::assembler::assemble_artifact;
use super::runner::StageRunner;
use super::stages::{StageContext, StageDefinition};

/// Tuning knobs for stage execution.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on a single stage's generation call.
    pub stage_timeout: Duration,
    /// Optional delay between stages. Pacing only - not a correctness
    /// requirement.
    pub stage_pacing: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(120),
            stage_pacing: Duration::ZERO,
        }
    }
}

/// Drives the stage pipeline for a single job.
///
/// Stage execution is strictly sequential: stage `i + 1` never starts before
/// stage `i`'s output is recorded. The first failure halts the pipeline and
/// becomes the job's terminal error - no later stage runs and no partial
/// artifact is assembled.
pub struct PipelineOrchestrator {
    store: Arc<dyn JobStore>,
    runner: StageRunner,
    stages: Arc<Vec<StageDefinition>>,
    pacing: Duration,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        generator: Arc<dyn BaseStoryGenerator>,
        stages: Arc<Vec<StageDefinition>>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            runner: StageRunner::new(generator, config.stage_timeout),
            stages,
            pacing: config.stage_pacing,
        }
    }

    /// Run the pipeline for `job_id` to a terminal state.
    ///
    /// Never propagates an error to the spawner - stage failures become the
    /// job's terminal error, and store errors (the record vanishing out from
    /// under the orchestrator) are logged.
    pub async fn run(self, job_id: Uuid, input: String) {
        if let Err(e) = self.drive(job_id, input).await {
            error!(job_id = %job_id, error = %e, "job store rejected an orchestrator write");
        }
    }

    async fn drive(&self, job_id: Uuid, input: String) -> Result<(), JobStoreError> {
        let mut context = StageContext::new(input);
        let total_steps = self.stages.len() as u32;

        for (index, stage) in self.stages.iter().enumerate() {
            let remaining: u64 = self.stages[index..]
                .iter()
                .map(|s| s.estimated_duration_secs)
                .sum();

            self.store
                .set_progress(
                    job_id,
                    JobProgress {
                        current_step_index: index as u32,
                        total_steps,
                        step_label: stage.display_label.clone(),
                        estimated_seconds_remaining: remaining,
                    },
                )
                .await?;

            info!(
                job_id = %job_id,
                stage = %stage.id,
                step = index + 1,
                total = total_steps,
                "running stage"
            );

            match self.runner.run(stage, &context).await {
                Ok(output) => context.record_output(&stage.id, output),
                Err(failure) => {
                    warn!(
                        job_id = %job_id,
                        stage = %failure.stage_id,
                        cause = %failure.cause,
                        "stage failed, halting pipeline"
                    );
                    self.store.fail(job_id, failure.to_string()).await?;
                    return Ok(());
                }
            }

            if !self.pacing.is_zero() && index + 1 < self.stages.len() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        let sections = self.sections(&context);
        let artifact = assemble_artifact(&context.summary, &sections);
        self.store.complete(job_id, artifact).await?;

        info!(job_id = %job_id, total_stages = total_steps, "job complete");
        Ok(())
    }

    /// Ordered `(display label, output)` pairs for the assembler.
    ///
    /// Pairs positionally: `prior` holds one output per completed stage in
    /// execution order, so this stays correct even if two stages share an
    /// id.
    fn sections(&self, context: &StageContext) -> Vec<(String, String)> {
        self.stages
            .iter()
            .zip(context.prior.iter())
            .map(|(stage, (_, output))| (stage.display_label.clone(), output.clone()))
            .collect()
    }
}
