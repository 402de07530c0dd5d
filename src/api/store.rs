//! Record Store
//!
//! In-memory consumption records behind the reference server, optionally
//! persisted to a JSON file after every write.
//!
//! Records keep insertion order. Ids are UUID v4 strings assigned on create.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::RwLock;

use crate::records::{ConsumptionRecord, NewConsumption};

/// Errors raised by the record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct RecordStore {
    records: RwLock<Vec<ConsumptionRecord>>,
    path: Option<PathBuf>,
}

impl RecordStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Open a file-backed store, loading existing records if the file exists
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "Opened record store"
        );

        Ok(Self {
            records: RwLock::new(records),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn list(&self) -> Vec<ConsumptionRecord> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> StoreResult<ConsumptionRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.has_id(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Store a new record under a fresh id and return it
    pub async fn create(&self, new: NewConsumption) -> StoreResult<ConsumptionRecord> {
        let record = ConsumptionRecord::from_new(uuid::Uuid::new_v4().to_string(), new);

        let mut records = self.records.write().await;
        records.push(record.clone());
        if let Err(e) = self.persist(&records).await {
            records.pop();
            return Err(e);
        }

        tracing::debug!(id = ?record.id, "Created record");
        Ok(record)
    }

    /// Replace the record with `id`; the stored copy keeps that id
    pub async fn update(&self, id: &str, mut record: ConsumptionRecord) -> StoreResult<ConsumptionRecord> {
        record.id = Some(id.to_string());

        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.has_id(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let previous = std::mem::replace(slot, record.clone());
        if let Err(e) = self.persist(&records).await {
            if let Some(slot) = records.iter_mut().find(|r| r.has_id(id)) {
                *slot = previous;
            }
            return Err(e);
        }

        tracing::debug!(id, "Updated record");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<ConsumptionRecord> {
        let mut records = self.records.write().await;
        let pos = records
            .iter()
            .position(|r| r.has_id(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = records.remove(pos);
        if let Err(e) = self.persist(&records).await {
            records.insert(pos, removed);
            return Err(e);
        }

        tracing::debug!(id, "Deleted record");
        Ok(removed)
    }

    /// Write the full list to the backing file through a temp file + rename.
    /// Called with the write lock held so writes land in order. On failure
    /// callers undo their change so memory matches the file.
    async fn persist(&self, records: &[ConsumptionRecord]) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(records)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn lunch() -> NewConsumption {
        NewConsumption {
            name: "Lunch".to_string(),
            kind: "food".to_string(),
            category: "daily".to_string(),
            value: 12.5,
            source: "cash".to_string(),
            remark: None,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_uuid() {
        let store = RecordStore::in_memory();
        let a = store.create(lunch()).await.unwrap();
        let b = store.create(lunch()).await.unwrap();

        let id = a.id.clone().unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.list().await[0], a);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = RecordStore::in_memory();
        let created = store.create(lunch()).await.unwrap();
        let id = created.id.clone().unwrap();

        let mut changed = created.clone();
        changed.value = 20.0;
        changed.id = None;
        let updated = store.update(&id, changed).await.unwrap();
        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(store.get(&id).await.unwrap().value, 20.0);

        store.delete(&id).await.unwrap();
        assert!(store.is_empty().await);
        assert!(matches!(store.delete(&id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(&id, created).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_file_backed_store_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("consumptions.json");

        let id = {
            let store = RecordStore::open(&path).await.unwrap();
            assert!(store.is_empty().await);
            store.create(lunch()).await.unwrap().id.unwrap()
        };

        let reopened = RecordStore::open(&path).await.unwrap();
        assert_eq!(reopened.len().await, 1);
        assert_eq!(reopened.get(&id).await.unwrap().name, "Lunch");
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumptions.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            RecordStore::open(&path).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_records_unchanged() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        let path = nested.join("consumptions.json");

        let store = RecordStore::open(&path).await.unwrap();
        let created = store.create(lunch()).await.unwrap();
        let id = created.id.clone().unwrap();

        // the data directory turns into a plain file, so every write fails
        std::fs::remove_dir_all(&nested).unwrap();
        std::fs::write(&nested, "blocked").unwrap();

        assert!(matches!(store.create(lunch()).await, Err(StoreError::Io(_))));
        assert_eq!(store.len().await, 1);

        let mut changed = created.clone();
        changed.value = 99.0;
        assert!(store.update(&id, changed).await.is_err());
        assert_eq!(store.get(&id).await.unwrap().value, 12.5);

        assert!(store.delete(&id).await.is_err());
        assert_eq!(store.list().await, vec![created]);
    }
}
