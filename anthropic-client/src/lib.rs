//! Minimal client for the Anthropic Messages API.
//!
//! The crate is split along one seam: [`CompletionClient`] owns credential
//! checking and request shaping, while the [`MessagesTransport`] trait owns
//! the actual HTTPS round-trip. Production code uses [`HttpTransport`];
//! tests substitute a scripted transport and assert on call counts.
//!
//! # Example
//!
//! ```no_run
//! use anthropic_client::{CompletionClient, CredentialStore, HttpTransport};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = CredentialStore::from_env();
//! let client = CompletionClient::new(credentials, Arc::new(HttpTransport::new()));
//!
//! let text = client
//!     .complete("Summarize the trade-offs of WAL mode in SQLite.", 1024, None)
//!     .await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{CompletionClient, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL};
pub use credentials::CredentialStore;
pub use error::ClientError;
pub use transport::{HttpTransport, MessagesTransport};
pub use types::{ContentBlock, Message, MessagesRequest, MessagesResponse, Usage};
