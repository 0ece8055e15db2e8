//! Stage runner - executes a single pipeline stage.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::kernel::BaseStoryGenerator;

use super::stages::{StageContext, StageDefinition};

/// A single stage's failure. The orchestrator turns this into the job's
/// terminal error; it never reaches the launcher's caller.
#[derive(Debug, Error)]
#[error("stage '{stage_id}' failed: {cause}")]
pub struct StageFailure {
    pub stage_id: String,
    pub cause: String,
}

impl StageFailure {
    fn new(stage: &StageDefinition, cause: impl Into<String>) -> Self {
        Self {
            stage_id: stage.id.clone(),
            cause: cause.into(),
        }
    }
}

/// Executes one stage: exactly one generation call, bounded by a timeout.
///
/// No internal retry - retry policy, if any, belongs to the orchestrator.
/// The runner never touches the job store, which keeps it testable in
/// isolation with a scripted generator.
pub struct StageRunner {
    generator: Arc<dyn BaseStoryGenerator>,
    stage_timeout: Duration,
}

impl StageRunner {
    pub fn new(generator: Arc<dyn BaseStoryGenerator>, stage_timeout: Duration) -> Self {
        Self {
            generator,
            stage_timeout,
        }
    }

    /// Run one stage to text.
    ///
    /// Empty or whitespace-only output is a failure, not a success:
    /// accepting it would silently propagate garbage through every later
    /// stage and into the artifact.
    pub async fn run(
        &self,
        stage: &StageDefinition,
        context: &StageContext,
    ) -> Result<String, StageFailure> {
        let prompt = context.render_prompt(stage);
        debug!(stage = %stage.id, prompt_length = prompt.len(), "running stage");

        let generated = tokio::time::timeout(
            self.stage_timeout,
            self.generator.generate(&stage.id, &prompt),
        )
        .await
        .map_err(|_| {
            StageFailure::new(
                stage,
                format!(
                    "generation timed out after {}s",
                    self.stage_timeout.as_secs()
                ),
            )
        })?
        .map_err(|e| StageFailure::new(stage, e.to_string()))?;

        if generated.trim().is_empty() {
            warn!(stage = %stage.id, "generator returned empty output");
            return Err(StageFailure::new(stage, "generator returned empty output"));
        }

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ScriptedGenerator;

    fn stage(id: &str) -> StageDefinition {
        StageDefinition::new(id, format!("Stage {}", id), 10)
    }

    fn runner(generator: ScriptedGenerator, timeout: Duration) -> StageRunner {
        StageRunner::new(Arc::new(generator), timeout)
    }

    #[tokio::test]
    async fn successful_stage_returns_text() {
        let generator = ScriptedGenerator::new().with_output("analysis", "the analysis");
        let runner = runner(generator, Duration::from_secs(5));
        let context = StageContext::new("a long enough request");

        let output = runner.run(&stage("analysis"), &context).await.unwrap();

        assert_eq!(output, "the analysis");
    }

    #[tokio::test]
    async fn generator_error_becomes_stage_failure() {
        let generator = ScriptedGenerator::new().with_failure("analysis", "backend unavailable");
        let runner = runner(generator, Duration::from_secs(5));
        let context = StageContext::new("a long enough request");

        let failure = runner.run(&stage("analysis"), &context).await.unwrap_err();

        assert_eq!(failure.stage_id, "analysis");
        assert!(failure.cause.contains("backend unavailable"));
    }

    #[tokio::test]
    async fn empty_output_is_a_failure() {
        let generator = ScriptedGenerator::new().with_output("analysis", "   \n  ");
        let runner = runner(generator, Duration::from_secs(5));
        let context = StageContext::new("a long enough request");

        let failure = runner.run(&stage("analysis"), &context).await.unwrap_err();

        assert!(failure.cause.contains("empty output"));
    }

    #[tokio::test]
    async fn slow_generator_times_out() {
        let generator = ScriptedGenerator::new()
            .with_output("analysis", "too late")
            .with_delay(Duration::from_millis(200));
        let runner = runner(generator, Duration::from_millis(20));
        let context = StageContext::new("a long enough request");

        let failure = runner.run(&stage("analysis"), &context).await.unwrap_err();

        assert!(failure.cause.contains("timed out"));
    }
}
