// HTTP server modules
pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;

// LLM abstraction layer
pub mod llm;

use std::sync::Arc;
use tracing::{error, info};

use config::AppConfig;
use llm::{ModelClient, OpenAiClient, UnavailableClient};
use service::FlowchartService;

/// Construct the model client described by `config`
///
/// Construction failures are logged and replaced by an [`UnavailableClient`],
/// so the server still starts and answers generation requests with 500.
pub fn build_model_client(config: &AppConfig) -> Arc<dyn ModelClient> {
    match OpenAiClient::new(config.endpoint.clone(), &config.api_key, config.request_timeout) {
        Ok(client) => {
            info!(endpoint = ?client.endpoint(), model = %config.model, "model client initialized");
            Arc::new(client)
        }
        Err(err) => {
            error!(error = %err, "failed to initialize model client");
            Arc::new(UnavailableClient::new(err.to_string()))
        }
    }
}

/// Wire a [`FlowchartService`] from configuration
pub fn build_service(config: &AppConfig) -> Arc<FlowchartService> {
    let client = build_model_client(config);
    Arc::new(
        FlowchartService::new(client, config.model.clone())
            .with_generation(config.generation.clone()),
    )
}
