//! Error types for the completion client.

use thiserror::Error;

/// Errors produced by [`crate::CompletionClient`] and its transports
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No API key configured; checked before any network call
    #[error("No API key configured")]
    CredentialMissing,

    /// The completion service returned a non-success status
    #[error("Completion service returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response that does not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
