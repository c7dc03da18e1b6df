//! HTTP-facing error type and rejection recovery

use std::convert::Infallible;
use thiserror::Error;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::llm::LlmError;
use crate::models::ErrorResponse;

pub const EMPTY_PROMPT_MESSAGE: &str = "Prompt cannot be empty.";
pub const CLIENT_INIT_MESSAGE: &str = "Failed to initialize OpenAI client";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Failures of a flowchart request, one variant per response class
#[derive(Debug, Error)]
pub enum ApiError {
    /// Prompt empty or absent
    #[error("Prompt cannot be empty.")]
    InvalidInput,

    /// The model client was never constructed
    #[error("Failed to initialize OpenAI client: {0}")]
    ClientInitialization(String),

    /// The model call itself failed
    #[error("Error: {0}")]
    Upstream(#[source] LlmError),

    /// Anything else; the detail is logged, never returned
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::ClientInitialization(_)
            | ApiError::Upstream(_)
            | ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body
    pub fn detail(&self) -> String {
        match self {
            ApiError::InvalidInput => EMPTY_PROMPT_MESSAGE.to_string(),
            ApiError::ClientInitialization(_) => CLIENT_INIT_MESSAGE.to_string(),
            ApiError::Upstream(err) => format!("Error: {}", err),
            ApiError::Unexpected(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }

    /// Emit the log event matching this error's severity
    pub fn log(&self) {
        match self {
            ApiError::InvalidInput => warn!("rejected request: {}", self),
            ApiError::ClientInitialization(reason) => {
                error!(reason = %reason, "model client unavailable")
            }
            ApiError::Upstream(err) => error!(error = %err, "error during model completion"),
            ApiError::Unexpected(detail) => {
                error!(severity = "critical", detail = %detail, "unexpected error")
            }
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Initialization(reason) => ApiError::ClientInitialization(reason),
            other => ApiError::Upstream(other),
        }
    }
}

impl Reply for ApiError {
    fn into_response(self) -> Response {
        json_error(self.status_code(), self.detail())
    }
}

pub fn json_error(status: StatusCode, detail: impl Into<String>) -> Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            detail: detail.into(),
        }),
        status,
    )
    .into_response()
}

/// Turn warp's built-in rejections into JSON error bodies
pub async fn handle_rejection(err: warp::Rejection) -> Result<Response, Infallible> {
    let response = if err.is_not_found() {
        json_error(StatusCode::NOT_FOUND, "Not Found")
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        json_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", e),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        json_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        json_error(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        json_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else {
        error!(severity = "critical", rejection = ?err, "unhandled rejection");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_MESSAGE)
    };

    Ok(response)
}
