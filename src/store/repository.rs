//! Persistence collaborators for the record store.
//!
//! A repository only ever reads or overwrites the whole collection; there is
//! no partial update. [`JsonFileRepository`] backs the running service and
//! [`InMemoryRepository`] backs tests and embedding.

use crate::{
    entities::EquipmentRecord,
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Whole-document load/save of the record collection.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Reads the entire collection.
    async fn load_all(&self) -> Result<Vec<EquipmentRecord>>;

    /// Overwrites the entire collection.
    async fn save_all(&self, records: &[EquipmentRecord]) -> Result<()>;
}

/// Stores the collection as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Creates a repository for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RecordRepository for JsonFileRepository {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_all(&self) -> Result<Vec<EquipmentRecord>> {
        debug!("Reading record document");
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::storage(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        let records: Vec<EquipmentRecord> = serde_json::from_str(&contents).map_err(|e| {
            Error::storage(format!("Failed to parse {}: {e}", self.path.display()))
        })?;
        info!("Loaded {} records", records.len());
        Ok(records)
    }

    #[instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()))]
    async fn save_all(&self, records: &[EquipmentRecord]) -> Result<()> {
        let body = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        // Write beside the target, then rename over it.
        let temp = self.temp_path();
        tokio::fs::write(&temp, body).await.map_err(|e| {
            Error::storage(format!("Failed to write {}: {e}", temp.display()))
        })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            Error::storage(format!("Failed to replace {}: {e}", self.path.display()))
        })?;

        debug!("Record document written");
        Ok(())
    }
}

/// Keeps the "persisted" collection in memory.
///
/// Saves can be made to fail on demand to exercise storage-error paths.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: Mutex<Vec<EquipmentRecord>>,
    fail_saves: AtomicBool,
}

impl InMemoryRepository {
    /// Creates a repository pre-populated with `records`.
    #[must_use]
    pub fn with_records(records: Vec<EquipmentRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// What was last saved.
    pub async fn persisted(&self) -> Vec<EquipmentRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn load_all(&self) -> Result<Vec<EquipmentRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn save_all(&self, records: &[EquipmentRecord]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::storage("in-memory repository configured to fail"));
        }
        *self.records.lock().await = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_json_file_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = JsonFileRepository::new(dir.path().join("data").join("records.json"));

        let records = vec![
            record_with_schedule("I1", Some(date(2023, 1, 1)), 1),
            record_with_schedule("I2", None, 2),
        ];
        repo.save_all(&records).await?;

        let loaded = repo.load_all().await?;
        assert_eq!(loaded, records);
        assert!(!repo.temp_path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_json_file_is_pretty_printed_with_original_field_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = JsonFileRepository::new(dir.path().join("records.json"));
        repo.save_all(&[record_with_schedule("I1", Some(date(2023, 1, 1)), 1)])
            .await?;

        let text = std::fs::read_to_string(repo.path())?;
        assert!(text.starts_with("[\n  {\n    \"SIN\": \"I1\""));
        assert!(text.contains("\"Feeder Id\""));
        assert!(text.contains("\"NextMaintenanceDate\": \"2024-01-01\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_unrelated_write_keeps_stored_date_values() -> Result<()> {
        use crate::{core::record::create_record, store::RecordStore};
        use serde_json::{Value, json};
        use std::sync::Arc;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("records.json");
        let document = json!([
            {"SIN": "I1", "LastMaintenanceDate": "2023/01/05", "NextMaintenanceDate": "", "Cycle": "1"},
            {"SIN": "I2", "LastMaintenanceDate": "after the monsoon", "NextMaintenanceDate": null}
        ]);
        std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;

        let store = RecordStore::open(Arc::new(JsonFileRepository::new(&path))).await?;
        create_record(&store, record_with_schedule("I3", Some(date(2024, 1, 1)), 1)).await?;

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(saved[0]["LastMaintenanceDate"], json!("2023/01/05"));
        assert_eq!(saved[0]["NextMaintenanceDate"], json!(""));
        assert_eq!(saved[1]["LastMaintenanceDate"], json!("after the monsoon"));
        assert_eq!(saved[1]["NextMaintenanceDate"], Value::Null);
        assert_eq!(saved[2]["NextMaintenanceDate"], json!("2024-12-31"));
        Ok(())
    }

    #[tokio::test]
    async fn test_json_file_missing_is_storage_error() {
        let repo = JsonFileRepository::new("/nonexistent/dir/records.json");
        let result = repo.load_all().await;
        assert!(matches!(result, Err(Error::Storage { .. })));
    }

    #[tokio::test]
    async fn test_json_file_malformed_is_storage_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json")?;
        let result = JsonFileRepository::new(path).load_all().await;
        assert!(matches!(result, Err(Error::Storage { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_in_memory_failing_saves() -> Result<()> {
        let repo = InMemoryRepository::default();
        repo.set_fail_saves(true);
        assert!(repo.save_all(&[]).await.is_err());
        repo.set_fail_saves(false);
        repo.save_all(&[record_with_schedule("I1", None, 1)]).await?;
        assert_eq!(repo.persisted().await.len(), 1);
        Ok(())
    }
}
