// Story generation via OpenAI
//
// This is the infrastructure implementation of BaseStoryGenerator.
// What each stage asks for (the prompt) lives in the stories domain.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::completion::Prompt;
use rig::providers::openai;

use super::traits::BaseStoryGenerator;

const DEFAULT_MODEL: &str = openai::GPT_4O;
const PREAMBLE: &str = "You are a thoughtful biographer writing warm, \
                        truthful prose from the material you are given.";

/// OpenAI implementation of the story generation capability
#[derive(Clone)]
pub struct OpenAIClient {
    client: openai::Client,
    model: String,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        let client = openai::Client::new(&api_key);
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a specific model instead of the default.
    pub fn with_model(api_key: String, model: impl Into<String>) -> Self {
        let client = openai::Client::new(&api_key);
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseStoryGenerator for OpenAIClient {
    async fn generate(&self, stage_id: &str, prompt: &str) -> Result<String> {
        tracing::debug!(
            stage = %stage_id,
            prompt_length = prompt.len(),
            model = %self.model,
            "Building OpenAI agent for stage generation"
        );

        let agent = self
            .client
            .agent(&self.model)
            .preamble(PREAMBLE)
            .max_tokens(4096)
            .build();

        let response = agent
            .prompt(prompt)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    stage = %stage_id,
                    model = %self.model,
                    "OpenAI API call failed"
                );
                e
            })
            .context("Failed to call OpenAI API")?;

        tracing::debug!(
            stage = %stage_id,
            response_length = response.len(),
            "OpenAI API response received"
        );

        Ok(response)
    }
}
