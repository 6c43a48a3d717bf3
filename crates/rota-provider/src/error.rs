//! Error types for the rota-provider crate.

use std::time::Duration;

/// Errors produced while talking to a single provider endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (connection refused, DNS, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// 2xx response that lacks the fields this wire family expects
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The attempt did not complete within its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// HTTP status carried by the error, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
