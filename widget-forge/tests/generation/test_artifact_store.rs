//! Tests for artifact persistence, manifest upserts, enumeration and cleanup

use widget_forge::generation::artifact_store::{ArtifactStore, MANIFEST_KEY};
use widget_forge::generation::{GeneratedFile, ManifestEntry, RegistryPlanner};
use widget_forge::store::{KeyValueStore, SqliteStore};

use super::common::memory_store;
use std::sync::Arc;

fn service_file(path: &str) -> GeneratedFile {
    GeneratedFile {
        path: path.to_string(),
        content: "export async function fetchData(): Promise<number> { return 1; }".to_string(),
    }
}

fn manifest_entries(store: &dyn KeyValueStore) -> Vec<ManifestEntry> {
    let json = store.get(MANIFEST_KEY).unwrap().unwrap_or_default();
    if json.is_empty() {
        return Vec::new();
    }
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_write_all_success() {
    let store = memory_store();
    let artifacts = ArtifactStore::new(store.clone());

    let report = artifacts.write_all(&[
        service_file("src/services/a.ts"),
        service_file("src/services/b.ts"),
    ]);

    assert!(report.success);
    assert_eq!(report.written_files.len(), 2);
    assert!(report.errors.is_empty());
    assert_eq!(manifest_entries(store.as_ref()).len(), 2);
}

#[test]
fn test_write_all_is_idempotent_per_path() {
    let store = memory_store();
    let artifacts = ArtifactStore::new(store.clone());
    let file = service_file("src/services/a.ts");

    artifacts.write_all(std::slice::from_ref(&file));
    let first = manifest_entries(store.as_ref());
    artifacts.write_all(&[file]);
    let second = manifest_entries(store.as_ref());

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].path, "services/a.ts");
    // The second write supersedes the first entry
    assert!(second[0].timestamp >= first[0].timestamp);
}

#[test]
fn test_prefixed_and_unprefixed_paths_share_one_entry() {
    let store = memory_store();
    let artifacts = ArtifactStore::new(store.clone());

    artifacts.write_all(&[service_file("src/services/a.ts")]);
    artifacts.write_all(&[service_file("services/a.ts")]);

    assert_eq!(manifest_entries(store.as_ref()).len(), 1);
}

#[test]
fn test_list_all_round_trips_content() {
    let artifacts = ArtifactStore::new(memory_store());
    let files = vec![
        service_file("services/a.ts"),
        service_file("services/b.ts"),
    ];

    let report = artifacts.write_all(&files);
    assert!(report.success);

    let mut listed = artifacts.list_all().unwrap();
    listed.sort_by(|a, b| a.path.cmp(&b.path));

    assert_eq!(listed.len(), 2);
    for (artifact, file) in listed.iter().zip(files.iter()) {
        assert_eq!(artifact.path, file.path);
        assert_eq!(artifact.content, file.content);
        assert!(!artifact.timestamp.is_empty());
    }
}

#[test]
fn test_invalid_file_never_reaches_the_store() {
    let store = memory_store();
    let artifacts = ArtifactStore::new(store.clone());

    let report = artifacts.write_all(&[
        service_file("src/services/good.ts"),
        GeneratedFile {
            path: "src/services/empty.ts".to_string(),
            content: "   \n".to_string(),
        },
    ]);

    assert!(!report.success);
    assert_eq!(report.written_files, vec!["services/good.ts"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, "services/empty.ts");
    assert_eq!(
        report.errors[0].reason,
        "Validation failed for services/empty.ts: Empty file content"
    );

    // Only the accepted file is tracked
    let entries = manifest_entries(store.as_ref());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "services/good.ts");
}

#[test]
fn test_write_all_with_no_written_files_is_failure() {
    let artifacts = ArtifactStore::new(memory_store());
    let report = artifacts.write_all(&[GeneratedFile {
        path: "services/empty.ts".to_string(),
        content: String::new(),
    }]);
    assert!(!report.success);
    assert!(report.written_files.is_empty());
}

#[test]
fn test_clear_all_removes_artifacts_manifest_and_plans() {
    let store = memory_store();
    let artifacts = ArtifactStore::new(store.clone());
    let registry = RegistryPlanner::new(store.clone());

    artifacts.write_all(&[service_file("services/a.ts")]);
    registry
        .plan_registration("moving-average-chart", "Moving Average Chart")
        .unwrap();
    assert!(!store.list_keys().unwrap().is_empty());

    artifacts.clear_all().unwrap();

    assert!(artifacts.list_all().unwrap().is_empty());
    let remaining = store.list_keys().unwrap();
    assert!(
        remaining.is_empty(),
        "orphaned keys left behind: {:?}",
        remaining
    );
}

/// Store whose writes always fail, for exercising the storage error path
struct BrokenStore;

impl widget_forge::store::KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
    fn set(&self, key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk full writing {}", key)
    }
    fn delete(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }
    fn list_keys(&self) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_write_failure_reported_as_storage_error() {
    let artifacts = ArtifactStore::new(Arc::new(BrokenStore));
    let report = artifacts.write_all(&[service_file("src/services/a.ts")]);

    assert!(!report.success);
    assert!(report.written_files.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, "services/a.ts");
    assert!(report.errors[0]
        .reason
        .starts_with("Storage failed for services/a.ts:"));
    assert!(report.errors[0].reason.contains("disk full"));
}

#[test]
fn test_artifact_store_works_over_sqlite() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let artifacts = ArtifactStore::new(store);

    let report = artifacts.write_all(&[service_file("src/services/a.ts")]);
    assert!(report.success);

    let listed = artifacts.list_all().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, "services/a.ts");

    artifacts.clear_all().unwrap();
    assert!(artifacts.list_all().unwrap().is_empty());
}
