//! In-memory record store kept in sync with an injected repository.
//!
//! The collection is loaded once when the store is opened. Every mutation is
//! applied to the in-memory collection and then the whole collection is
//! written back through the repository. Mutations are serialised behind the
//! write lock, and a failed save rolls the in-memory collection back.

pub mod repository;

pub use repository::{InMemoryRepository, JsonFileRepository, RecordRepository};

use crate::{entities::EquipmentRecord, errors::Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

/// Ordered, identifier-unique collection of equipment records.
pub struct RecordStore {
    repository: Arc<dyn RecordRepository>,
    records: RwLock<Vec<EquipmentRecord>>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Loads the collection from `repository`.
    ///
    /// Fails with the repository's error if the document cannot be read; the
    /// service treats that as fatal at startup.
    #[instrument(skip(repository))]
    pub async fn open(repository: Arc<dyn RecordRepository>) -> Result<Self> {
        let records = repository.load_all().await?;
        info!("Record store opened with {} records", records.len());
        Ok(Self {
            repository,
            records: RwLock::new(records),
        })
    }

    /// A copy of the whole collection, in stored order.
    pub async fn snapshot(&self) -> Vec<EquipmentRecord> {
        self.records.read().await.clone()
    }

    /// Looks up a record by exact identifier.
    pub async fn get(&self, sin: &str) -> Option<EquipmentRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.sin == sin)
            .cloned()
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True when the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Applies `change` to the collection and persists the result.
    ///
    /// If `change` fails nothing is saved. If saving fails the in-memory
    /// collection is restored to its previous state and the storage error is
    /// returned.
    pub async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<EquipmentRecord>) -> Result<T>,
    {
        let mut records = self.records.write().await;
        let previous = records.clone();

        let outcome = change(&mut *records)?;

        if let Err(e) = self.repository.save_all(&records[..]).await {
            error!("Failed to persist records, rolling back: {}", e);
            *records = previous;
            return Err(e);
        }

        Ok(outcome)
    }
}
