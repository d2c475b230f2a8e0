//! Completion client: credential checks and request shaping on top of a
//! [`MessagesTransport`].

use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::error::ClientError;
use crate::transport::MessagesTransport;
use crate::types::{Message, MessagesRequest, MessagesResponse};

/// Default model for completions
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default output-token ceiling when callers do not specify one
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

/// Client for single-turn text completions.
///
/// Holds its collaborators explicitly so tests can substitute a scripted
/// transport and an empty credential store. No retries happen at this
/// layer; a failed request is surfaced as-is.
pub struct CompletionClient {
    credentials: CredentialStore,
    transport: Arc<dyn MessagesTransport>,
    model: String,
}

impl CompletionClient {
    pub fn new(credentials: CredentialStore, transport: Arc<dyn MessagesTransport>) -> Self {
        Self {
            credentials,
            transport,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model used for completions
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Send one completion request and return the text of the first content
    /// block.
    ///
    /// Fails with [`ClientError::CredentialMissing`] before the transport is
    /// touched if no API key is configured.
    pub async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        system: Option<&str>,
    ) -> Result<String, ClientError> {
        let api_key = self
            .credentials
            .get()
            .ok_or(ClientError::CredentialMissing)?;

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: max_output_tokens,
            system: system.map(str::to_string),
            messages: vec![Message::user(prompt)],
        };

        let response = self.transport.send(&request, &api_key).await?;
        extract_text(&response)
    }
}

/// Pull the first text block out of a response
fn extract_text(response: &MessagesResponse) -> Result<String, ClientError> {
    response
        .content
        .iter()
        .find_map(|block| block.text.clone())
        .ok_or_else(|| {
            ClientError::MalformedResponse("response contained no text content".to_string())
        })
}
