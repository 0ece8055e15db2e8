//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::{OpenAIClient, ServerDeps};
use crate::server::routes::{
    health_handler, start_story_handler, story_artifact_handler, story_status_handler,
};
use crate::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router from configuration.
pub fn build_app(config: &Config) -> Router {
    let openai_client = Arc::new(OpenAIClient::new(config.openai_api_key.clone()));
    let deps = Arc::new(ServerDeps::new(openai_client, config));
    build_app_with_deps(deps)
}

/// Build the router over preconstructed dependencies.
///
/// Tests inject scripted generators and short pipelines here.
pub fn build_app_with_deps(deps: Arc<ServerDeps>) -> Router {
    let state = AppState { deps };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/stories", post(start_story_handler))
        .route("/api/stories/:id/status", get(story_status_handler))
        .route("/api/stories/:id/artifact", get(story_artifact_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
