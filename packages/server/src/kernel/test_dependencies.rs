//! Test doubles for the generation capability.
//!
//! Shipped alongside the infrastructure traits (not behind cfg(test)) so
//! integration tests can build ServerDeps without an OpenAI key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::traits::BaseStoryGenerator;

/// Scripted generator: each stage id maps to a canned output or failure.
///
/// Doubles as a spy - it counts invocations, which the halt-on-failure tests
/// use to prove that no stage runs after the first failure.
#[derive(Default)]
pub struct ScriptedGenerator {
    outputs: HashMap<String, Result<String, String>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful output for a stage.
    pub fn with_output(mut self, stage_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.outputs.insert(stage_id.into(), Ok(text.into()));
        self
    }

    /// Script a failure for a stage.
    pub fn with_failure(mut self, stage_id: impl Into<String>, cause: impl Into<String>) -> Self {
        self.outputs.insert(stage_id.into(), Err(cause.into()));
        self
    }

    /// Sleep before answering, to simulate a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of generation calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseStoryGenerator for ScriptedGenerator {
    async fn generate(&self, stage_id: &str, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.outputs.get(stage_id) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(cause)) => Err(anyhow::anyhow!("{}", cause)),
            None => Ok(format!("generated text for stage {}", stage_id)),
        }
    }
}
