//! Error types shared by the Graph gateway and the deletion engine.

use thiserror::Error;

/// Failures raised while talking to the Graph API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A required parameter was missing; no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request could not be completed or its body could not be parsed
    #[error("Remote error: {0}")]
    Remote(String),

    /// The API answered but reported that the operation did not succeed
    #[error("Rejected by API: {0}")]
    Rejected(String),
}

impl GraphError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL: it carries the access token in its query string
        Self::Remote(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Remote(format!("Failed to parse response JSON: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
