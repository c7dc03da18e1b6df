//! LLM Abstraction Layer
//!
//! This module provides a small interface for sending a chat conversation to
//! a hosted completion service (OpenAI or Azure OpenAI) and reading back the
//! generated text.

pub mod core;
pub mod openai;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{ModelClient, UnavailableClient},
    types::{ChatMessage, ChatRole, CompletionRequest},
};

pub use openai::{Endpoint, OpenAiClient};
