// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Which stages run and what the prompts ask for is decided by the stories
// domain; this layer only turns a rendered prompt into text.
//
// Naming convention: Base* for trait names (e.g., BaseStoryGenerator)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Story generation trait (Infrastructure - generic LLM capability)
// =============================================================================

#[async_trait]
pub trait BaseStoryGenerator: Send + Sync {
    /// Generate the text for one pipeline stage from a rendered prompt.
    ///
    /// `stage_id` identifies the stage for logging and provider routing; the
    /// prompt already carries the request plus all prior stage outputs.
    /// Implementations make exactly one external call per invocation -
    /// retry policy belongs to the caller.
    async fn generate(&self, stage_id: &str, prompt: &str) -> Result<String>;
}
