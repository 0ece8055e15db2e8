// Lifebook - story generation API core
//
// This crate provides the backend for turning one free-text life-story
// request into an assembled multi-chapter narrative. A launch request starts
// a background pipeline job; clients poll the status endpoint until the job
// reaches a terminal state.
//
// Infrastructure (job store, generation clients, dependency container) lives
// in kernel/; business logic (stages, orchestration, assembly) lives in
// domains/stories/.

pub mod domains;
pub mod kernel;
pub mod server;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    /// Inclusive lower bound on request input length, in characters.
    pub min_input_len: usize,
    /// Inclusive upper bound on request input length, in characters.
    pub max_input_len: usize,
    /// Upper bound on a single stage's generation call.
    pub stage_timeout_secs: u64,
    /// Optional delay between stages, to avoid hammering the backend.
    pub stage_pacing_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            min_input_len: env_or("MIN_INPUT_LEN", 12)?,
            max_input_len: env_or("MAX_INPUT_LEN", 20_000)?,
            stage_timeout_secs: env_or("STAGE_TIMEOUT_SECS", 120)?,
            stage_pacing_ms: env_or("STAGE_PACING_MS", 0)?,
        })
    }
}

/// Parse an env var, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}
