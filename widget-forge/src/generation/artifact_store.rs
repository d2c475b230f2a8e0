//! Stage 4: Artifact storage
//!
//! Writes accepted files and a manifest into the key-value store. Files are
//! processed independently: one failed file never blocks its siblings, and
//! there is no transactional multi-file commit. The manifest is the only
//! source of truth for enumeration; `list_keys` is used solely for
//! namespace cleanup.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use widget_forge_sdk::log_artifact_stored;

use crate::generation::error::GenerationError;
use crate::generation::registry::{
    LIBRARY_PLAN_KEY_PREFIX, TYPES_PLAN_KEY_PREFIX, WIDGET_PLAN_KEY_PREFIX,
};
use crate::generation::types::{
    FileError, GeneratedFile, ManifestEntry, StoredArtifact, WriteReport,
};
use crate::generation::validator::validate;
use crate::store::KeyValueStore;

/// Namespace prefix for per-artifact keys
pub const ARTIFACT_KEY_PREFIX: &str = "generated_file_";

/// Key holding the JSON-encoded ordered list of [`ManifestEntry`]
pub const MANIFEST_KEY: &str = "generated_files_manifest";

/// Fixed project-root prefix stripped once from logical paths
const PROJECT_ROOT_PREFIX: &str = "src/";

/// Resolve the canonical store path for a logical path: drop a leading
/// `./` and strip the project-root prefix once if present. `src/services/a.ts`
/// and `services/a.ts` resolve to the same artifact.
pub fn canonical_path(path: &str) -> String {
    let path = path.strip_prefix("./").unwrap_or(path);
    path.strip_prefix(PROJECT_ROOT_PREFIX)
        .unwrap_or(path)
        .to_string()
}

/// Deterministic sanitization of a canonical path into a store key
fn artifact_key(canonical: &str) -> String {
    let sanitized: String = canonical
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}{}", ARTIFACT_KEY_PREFIX, sanitized)
}

/// Persists validated artifacts plus the manifest index
pub struct ArtifactStore {
    store: Arc<dyn KeyValueStore>,
}

impl ArtifactStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a batch of generated files.
    ///
    /// Each file is validated, written, and upserted into the manifest
    /// independently; `success` is true iff at least one file was written
    /// and zero files errored. A previously-succeeded file stays persisted
    /// even when the overall report is a failure.
    pub fn write_all(&self, files: &[GeneratedFile]) -> WriteReport {
        let mut manifest = self.load_manifest();
        let mut written_files = Vec::new();
        let mut errors = Vec::new();

        for file in files {
            let canonical = canonical_path(&file.path);

            let result = validate(&canonical, &file.content);
            if !result.valid {
                errors.push(file_error(GenerationError::ValidationFailed {
                    path: canonical,
                    reason: result
                        .reason
                        .unwrap_or_else(|| "Validation failed".to_string()),
                }));
                continue;
            }

            let key = artifact_key(&canonical);
            if let Err(e) = self.store.set(&key, &file.content) {
                errors.push(file_error(GenerationError::StorageError {
                    path: canonical,
                    reason: e.to_string(),
                }));
                continue;
            }

            upsert_manifest(
                &mut manifest,
                ManifestEntry {
                    path: canonical.clone(),
                    timestamp: Utc::now().to_rfc3339(),
                    size: file.content.len(),
                },
            );
            if let Err(e) = self.save_manifest(&manifest) {
                // Content is persisted but untracked; report it as a failure
                errors.push(file_error(GenerationError::StorageError {
                    path: canonical,
                    reason: e.to_string(),
                }));
                continue;
            }

            log_artifact_stored!(&canonical, &key);
            written_files.push(canonical);
        }

        WriteReport {
            success: !written_files.is_empty() && errors.is_empty(),
            written_files,
            errors,
        }
    }

    /// Re-enumerate every artifact tracked by the manifest. Entries whose
    /// content key has disappeared are skipped.
    pub fn list_all(&self) -> Result<Vec<StoredArtifact>> {
        let manifest = self.load_manifest();
        let mut artifacts = Vec::with_capacity(manifest.len());

        for entry in manifest {
            let key = artifact_key(&entry.path);
            if let Some(content) = self
                .store
                .get(&key)
                .with_context(|| format!("Failed to read artifact {}", entry.path))?
            {
                artifacts.push(StoredArtifact {
                    path: entry.path,
                    content,
                    timestamp: entry.timestamp,
                });
            }
        }
        Ok(artifacts)
    }

    /// Remove every tracked artifact, the manifest, and any pending
    /// registry update plans, leaving no orphaned keys.
    pub fn clear_all(&self) -> Result<()> {
        for entry in self.load_manifest() {
            self.store.delete(&artifact_key(&entry.path))?;
        }
        self.store.delete(MANIFEST_KEY)?;

        // Sweep strays: artifacts missing from the manifest and all plan kinds
        let cleanup_prefixes = [
            ARTIFACT_KEY_PREFIX,
            WIDGET_PLAN_KEY_PREFIX,
            TYPES_PLAN_KEY_PREFIX,
            LIBRARY_PLAN_KEY_PREFIX,
        ];
        for key in self.store.list_keys()? {
            if cleanup_prefixes
                .iter()
                .any(|prefix| key.starts_with(prefix))
            {
                self.store.delete(&key)?;
            }
        }
        Ok(())
    }

    /// Manifest contents, treating an absent or unreadable manifest as empty
    fn load_manifest(&self) -> Vec<ManifestEntry> {
        match self.store.get(MANIFEST_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn save_manifest(&self, manifest: &[ManifestEntry]) -> Result<()> {
        let json = serde_json::to_string(manifest).context("Failed to serialize manifest")?;
        self.store
            .set(MANIFEST_KEY, &json)
            .context("Failed to persist manifest")
    }
}

/// Flatten a per-file error variant into a report entry. The variants
/// carry their path, so it doubles as the entry's join key.
fn file_error(err: GenerationError) -> FileError {
    let path = match &err {
        GenerationError::ValidationFailed { path, .. }
        | GenerationError::StorageError { path, .. }
        | GenerationError::CodeGenerationFailed { path, .. } => path.clone(),
        _ => String::new(),
    };
    FileError {
        path,
        reason: err.to_string(),
    }
}

/// Replace the entry for the same path or append a new one; the manifest
/// never holds two entries for one path
fn upsert_manifest(manifest: &mut Vec<ManifestEntry>, entry: ManifestEntry) {
    match manifest.iter_mut().find(|e| e.path == entry.path) {
        Some(existing) => *existing = entry,
        None => manifest.push(entry),
    }
}
