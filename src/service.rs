//! Flowchart generation on top of a [`ModelClient`]

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::llm::{ChatMessage, CompletionRequest, GenerationConfig, ModelClient};

/// Instruction sent ahead of every user prompt
pub const FLOWCHART_SYSTEM_PROMPT: &str =
    "ONLY Generate a PlantUML diagram and no other text or comments.";

/// Validates prompts, calls the model and classifies failures
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone)]
pub struct FlowchartService {
    client: Arc<dyn ModelClient>,
    model: String,
    generation: GenerationConfig,
}

impl FlowchartService {
    pub fn new(client: Arc<dyn ModelClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The fixed two-message conversation for a prompt
    pub fn build_request(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(FLOWCHART_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
            config: self.generation.clone(),
        }
    }

    /// Generate diagram markup for a prompt
    ///
    /// Returns the model's text unchanged. An empty or missing prompt fails
    /// before the client is touched. A panic inside the client is reported as
    /// [`ApiError::Unexpected`].
    pub async fn generate(&self, prompt: Option<&str>) -> Result<String, ApiError> {
        let prompt = match prompt {
            Some(prompt) if !prompt.is_empty() => prompt,
            _ => return Err(ApiError::InvalidInput),
        };

        let request = self.build_request(prompt);
        let outcome = AssertUnwindSafe(self.client.complete(request))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => {
                info!(model = %self.model, chars = result.len(), "flowchart generated");
                Ok(result)
            }
            Ok(Err(err)) => Err(ApiError::from(err)),
            Err(panic) => Err(ApiError::Unexpected(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "model client panicked".to_string()
    }
}
