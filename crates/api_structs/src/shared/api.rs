use serde::{Deserialize, Serialize};

/// Body of a failed trigger endpoint
#[derive(Debug, Deserialize, Serialize)]
pub struct APIErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl APIErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}
