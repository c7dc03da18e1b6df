//! Core types for the LLM abstraction layer

use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;

/// Request for a single chat completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier (deployment name on Azure)
    pub model: String,
    /// Conversation sent to the model, in order
    pub messages: Vec<ChatMessage>,
    /// Generation parameters
    pub config: GenerationConfig,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: ChatRole,
    /// Plain text content
    pub content: String,
}

impl ChatMessage {
    /// Create a system instruction
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions that constrain the model
    System,
    /// Human input
    User,
    /// Model output
    Assistant,
}
