//! Conversion between the abstraction types and the chat-completions schema

use crate::llm::core::{error::LlmError, types::CompletionRequest};

use super::types::{ApiErrorEnvelope, ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// Convert a [`CompletionRequest`] into the wire request
///
/// `include_model` is false for Azure, where the deployment is part of the URL.
pub fn to_chat_completion_request(
    request: CompletionRequest,
    include_model: bool,
) -> ChatCompletionRequest {
    let messages = request
        .messages
        .into_iter()
        .map(|message| WireMessage {
            role: message.role,
            content: message.content,
        })
        .collect();

    ChatCompletionRequest {
        model: include_model.then_some(request.model),
        messages,
        max_tokens: request.config.max_tokens,
        temperature: request.config.temperature,
    }
}

/// Pull the first choice's text out of a response
///
/// The text is returned untouched; no trimming or fence stripping.
pub fn from_chat_completion_response(response: ChatCompletionResponse) -> Result<String, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::EmptyResponse("response contained no choices".to_string()))?;

    choice.message.content.ok_or_else(|| {
        LlmError::EmptyResponse(format!(
            "choice had no content (finish_reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })
}

/// Build an error from a non-success status and its body
///
/// Uses the service's own error message when the body is the standard
/// envelope, otherwise the raw body.
pub fn http_error(status: u16, body: String) -> LlmError {
    let body = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body,
    };
    LlmError::HttpError { status, body }
}
