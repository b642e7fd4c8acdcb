//! Storage accessor for mood records.
//!
//! [`RecordStore`] is the document-collection seam: insert, bounded and
//! unbounded finds, and lookup by id. [`MoodRepo`] wraps an optional store so
//! the service can keep serving in demo mode when no connection was made.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::mood_record::{MoodRecord, StoredRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("'{0}' is not a valid record id")]
    InvalidId(String),

    #[error("stored document {id} does not match the record schema: {source}")]
    MalformedDocument {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a record and returns the id generated for it.
    async fn insert(&self, record: &MoodRecord) -> Result<String, StoreError>;

    /// Returns at most `limit` records in whatever order the store yields them.
    async fn find_all(&self, limit: i64) -> Result<Vec<StoredRecord>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredRecord>, StoreError>;

    /// Unbounded read used by export and statistics.
    async fn find_all_for_scan(&self) -> Result<Vec<StoredRecord>, StoreError>;

    /// Number of stored documents, including ones that no longer decode.
    async fn count(&self) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Parses the opaque id handed out by [`RecordStore::insert`].
pub fn parse_record_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::InvalidId(id.to_string()))
}

pub(crate) fn decode_document(id: Uuid, document: Value) -> Result<StoredRecord, StoreError> {
    MoodRecord::from_document(document)
        .map(|record| StoredRecord {
            id: id.to_string(),
            record,
        })
        .map_err(|source| StoreError::MalformedDocument {
            id: id.to_string(),
            source,
        })
}

/// Decodes a batch of documents, dropping the ones that no longer fit the schema.
pub(crate) fn decode_documents<I>(rows: I) -> Vec<StoredRecord>
where
    I: IntoIterator<Item = (Uuid, Value)>,
{
    rows.into_iter()
        .filter_map(|(id, document)| match decode_document(id, document) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed mood document");
                None
            }
        })
        .collect()
}

/// Handle injected into every handler. `None` means demo mode.
#[derive(Clone, Default)]
pub struct MoodRepo {
    store: Option<Arc<dyn RecordStore>>,
}

impl MoodRepo {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn demo() -> Self {
        Self { store: None }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> AppResult<&dyn RecordStore> {
        self.store.as_deref().ok_or(AppError::StorageUnavailable)
    }

    pub async fn insert(&self, record: &MoodRecord) -> AppResult<String> {
        let id = self.store()?.insert(record).await?;
        tracing::debug!(%id, mood = record.mood, "Mood record inserted");
        Ok(id)
    }

    pub async fn find_all(&self, limit: i64) -> AppResult<Vec<StoredRecord>> {
        Ok(self.store()?.find_all(limit).await?)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<StoredRecord> {
        self.store()?
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Record not found".into()))
    }

    pub async fn find_all_for_scan(&self) -> AppResult<Vec<StoredRecord>> {
        Ok(self.store()?.find_all_for_scan().await?)
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(self.store()?.count().await?)
    }

    /// Full scan for CSV export; an empty collection is reported as not found.
    pub async fn export_scan(&self) -> AppResult<Vec<StoredRecord>> {
        if self.count().await? == 0 {
            return Err(AppError::NotFound("No records to export".into()));
        }
        self.find_all_for_scan().await
    }

    pub async fn ping(&self) -> AppResult<()> {
        Ok(self.store()?.ping().await?)
    }
}
