//! OpenAI provider implementation
//!
//! This module provides a client for the chat-completions API, either on
//! api.openai.com (or a compatible service) or on an Azure OpenAI resource.

pub mod client;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::{Endpoint, OpenAiClient, DEFAULT_OPENAI_BASE_URL};
