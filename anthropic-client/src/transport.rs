//! Transport seam between the client and the Messages API endpoint.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{ApiErrorEnvelope, MessagesRequest, MessagesResponse};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Protocol version sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One round-trip to the Messages API. Implemented by [`HttpTransport`] in
/// production and by scripted fakes in tests.
#[async_trait]
pub trait MessagesTransport: Send + Sync {
    async fn send(
        &self,
        request: &MessagesRequest,
        api_key: &str,
    ) -> Result<MessagesResponse, ClientError>;
}

/// HTTPS transport backed by reqwest
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the transport at a non-default endpoint (e.g. a local proxy)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagesTransport for HttpTransport {
    async fn send(
        &self,
        request: &MessagesRequest,
        api_key: &str,
    ) -> Result<MessagesResponse, ClientError> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Best-effort extraction of the API error message for diagnostics
            let message = match response.json::<ApiErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(ClientError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}
