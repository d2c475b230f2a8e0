//! Key-value storage abstraction for generated artifacts.
//!
//! The generation pipeline never touches a filesystem directly: everything
//! it persists goes through the [`KeyValueStore`] trait, so a SQLite file,
//! an embedded database, or an in-memory map can all back the artifact
//! store. Enumeration of artifacts is driven by the manifest entry, never
//! by key listing; `list_keys` exists for namespace-prefix cleanup.

pub mod sqlite;

pub use sqlite::SqliteStore;

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// String-keyed durable storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn list_keys(&self) -> Result<Vec<String>>;
}

/// In-memory store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.lock().expect("store lock poisoned");
        Ok(entries.keys().cloned().collect())
    }
}
