// Request and response bodies

use serde::{Deserialize, Serialize};

// POST /generate-flowchart body; a missing prompt is reported the same way
// as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowchartRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowchartResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

// Body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
