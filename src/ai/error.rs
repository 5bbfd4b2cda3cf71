//! AI-specific error handling.

use thiserror::Error;

/// Errors from the PR summarizer client.
#[derive(Error, Debug)]
pub enum AiError {
    /// Model identifier missing from configuration.
    #[error("Model not configured. Set the LAZYPR_MODEL environment variable")]
    ModelNotConfigured,

    /// Endpoint returned a non-success status.
    #[error("AI request failed: {0}")]
    RequestFailed(String),

    /// Response body did not contain usable PR content.
    #[error("Invalid response format from AI endpoint: {0}")]
    InvalidResponseFormat(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types
