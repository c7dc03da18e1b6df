//! Provider trait for model clients

use async_trait::async_trait;

use super::{error::LlmError, types::CompletionRequest};

/// Main interface that every model client must satisfy
///
/// Implementations are shared across requests behind an `Arc`, so they must
/// not require mutable access.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the conversation to the model and return the generated text
    ///
    /// # Errors
    /// Returns an [`LlmError`] describing why no completion was produced.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Stand-in client used when the real client could not be constructed
///
/// Every call fails with [`LlmError::Initialization`] carrying the original
/// reason, so the server can still start and answer with a proper error.
#[derive(Debug, Clone)]
pub struct UnavailableClient {
    reason: String,
}

impl UnavailableClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ModelClient for UnavailableClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Initialization(self.reason.clone()))
    }
}
