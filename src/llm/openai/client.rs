//! OpenAI / Azure OpenAI chat-completions client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

use crate::llm::core::{error::LlmError, provider::ModelClient, types::CompletionRequest};

use super::mapper::{from_chat_completion_response, http_error, to_chat_completion_request};
use super::types::ChatCompletionResponse;

/// Default base URL for the public OpenAI API
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Where completion requests are sent and how they authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Azure OpenAI resource; the model identifier is the deployment name
    Azure {
        endpoint: String,
        api_version: String,
    },
    /// OpenAI or any OpenAI-compatible service
    OpenAi { base_url: String },
}

impl Endpoint {
    /// Parse the configured base URL
    pub fn base_url(&self) -> Result<Url, LlmError> {
        let raw = match self {
            Endpoint::Azure { endpoint, .. } => endpoint,
            Endpoint::OpenAi { base_url } => base_url,
        };
        let url = Url::parse(raw)
            .map_err(|e| LlmError::Initialization(format!("Invalid model endpoint: {}", e)))?;
        if url.cannot_be_a_base() {
            return Err(LlmError::Initialization(format!(
                "Invalid model endpoint: {} cannot be a base URL",
                raw
            )));
        }
        Ok(url)
    }

    /// Build the chat-completions URL for a model
    ///
    /// The model is appended as a single escaped path segment.
    pub fn completions_url(&self, model: &str) -> Result<Url, LlmError> {
        let mut url = self.base_url()?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                LlmError::Initialization("Invalid model endpoint: cannot be a base URL".to_string())
            })?;
            segments.pop_if_empty();
            match self {
                Endpoint::Azure { .. } => {
                    segments.extend(["openai", "deployments", model, "chat", "completions"]);
                }
                Endpoint::OpenAi { .. } => {
                    segments.extend(["chat", "completions"]);
                }
            }
        }
        if let Endpoint::Azure { api_version, .. } = self {
            url.query_pairs_mut().append_pair("api-version", api_version);
        }
        Ok(url)
    }

    fn is_azure(&self) -> bool {
        matches!(self, Endpoint::Azure { .. })
    }
}

/// Client for a hosted chat-completions service
///
/// Holds a pooled HTTP client with the credential baked into its default
/// headers. Cheap to share behind an `Arc`.
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Target service
    endpoint: Endpoint,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Azure resource or OpenAI-compatible base URL
    /// * `api_key` - Service credential
    /// * `timeout` - Whole-request timeout applied to every call
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Initialization`] if the endpoint is not a valid URL,
    /// the key cannot be used as a header value, or the HTTP client cannot be
    /// built.
    pub fn new(endpoint: Endpoint, api_key: &str, timeout: Duration) -> Result<Self, LlmError> {
        endpoint.base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = match &endpoint {
            Endpoint::Azure { .. } => HeaderValue::from_str(api_key),
            Endpoint::OpenAi { .. } => HeaderValue::from_str(&format!("Bearer {}", api_key)),
        };
        let mut auth_value = auth_value.map_err(|e| {
            LlmError::Initialization(format!("API key is not a valid header value: {}", e))
        })?;
        auth_value.set_sensitive(true);

        match &endpoint {
            Endpoint::Azure { .. } => headers.insert("api-key", auth_value),
            Endpoint::OpenAi { .. } => headers.insert(AUTHORIZATION, auth_value),
        };

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                LlmError::Initialization(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn send_completion(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let url = self.endpoint.completions_url(&request.model)?;
        let body = to_chat_completion_request(request, !self.endpoint.is_azure());

        debug!(url = %url, messages = body.messages.len(), "sending chat completion");

        let response = self.http_client.post(url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(http_error(status.as_u16(), body));
        }

        let text = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&text)?;
        from_chat_completion_response(completion)
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.send_completion(request).await
    }
}
