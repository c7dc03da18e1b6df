//! Error types for the LLM layer

use thiserror::Error;

/// Errors that can occur when talking to the model service
#[derive(Debug, Error)]
pub enum LlmError {
    /// The client could not be constructed
    #[error("Client initialization failed: {0}")]
    Initialization(String),

    /// Non-success HTTP status from the service
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// The request did not complete within the transport timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection or other transport-level failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The service answered but returned no usable completion
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            LlmError::HttpError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            LlmError::SerializationError(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}
