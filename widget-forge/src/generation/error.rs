//! Error taxonomy for the generation pipeline.
//!
//! `CredentialMissing`, `Upstream` and `MalformedModelOutput` are fatal to
//! the current run when raised during analysis or planning. The per-file
//! variants (`CodeGenerationFailed`, `ValidationFailed`, `StorageError`)
//! never abort sibling files; the orchestrator collects them into the run's
//! error list.

use anthropic_client::ClientError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// No API key configured; surfaced before any network call
    #[error("No API key configured")]
    CredentialMissing,

    /// The completion service returned a non-success status
    #[error("Completion service returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The completion transport failed below the HTTP layer
    #[error("Completion transport failed: {0}")]
    Transport(String),

    /// Model output had no parseable JSON span, or the span failed strict
    /// schema validation
    #[error("Model output did not contain a valid {expected}: {detail}")]
    MalformedModelOutput {
        expected: &'static str,
        detail: String,
    },

    /// Synthesis failed for one file; local to that file
    #[error("Code generation failed for {path}: {reason}")]
    CodeGenerationFailed { path: String, reason: String },

    /// Validation rejected one file; local to that file
    #[error("Validation failed for {path}: {reason}")]
    ValidationFailed { path: String, reason: String },

    /// Persistence failed for one file; local to that file
    #[error("Storage failed for {path}: {reason}")]
    StorageError { path: String, reason: String },

    /// The generation request itself is unusable (e.g. empty prompt)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<ClientError> for GenerationError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::CredentialMissing => GenerationError::CredentialMissing,
            ClientError::Upstream { status, message } => {
                GenerationError::Upstream { status, message }
            }
            ClientError::Network(message) => GenerationError::Transport(message),
            ClientError::MalformedResponse(message) => GenerationError::Transport(message),
        }
    }
}
