//! Process-wide API credential handling.
//!
//! The credential is a single string secret with explicit set/get and no
//! implicit default beyond "absent". The store is a cheap cloneable handle;
//! every clone observes the same value, so a key set at startup (from the
//! environment or a persisted config entry) is visible to every component
//! that was constructed with a clone of the handle.

use std::sync::{Arc, RwLock};

/// Environment variable consulted by [`CredentialStore::from_env`]
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Shared handle to the process-wide API key
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    /// Create an empty store with no key configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from `ANTHROPIC_API_KEY` if set and non-empty
    pub fn from_env() -> Self {
        let store = Self::new();
        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            if !key.trim().is_empty() {
                store.set(key);
            }
        }
        store
    }

    /// Replace the configured key
    pub fn set(&self, key: impl Into<String>) {
        let mut guard = self.inner.write().expect("credential lock poisoned");
        *guard = Some(key.into());
    }

    /// Remove the configured key
    pub fn clear(&self) {
        let mut guard = self.inner.write().expect("credential lock poisoned");
        *guard = None;
    }

    /// Current key, if any
    pub fn get(&self) -> Option<String> {
        self.inner
            .read()
            .expect("credential lock poisoned")
            .clone()
    }

    pub fn is_configured(&self) -> bool {
        self.get().is_some()
    }
}
