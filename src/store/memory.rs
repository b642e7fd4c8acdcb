use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{decode_document, decode_documents, parse_record_id, RecordStore, StoreError};
use crate::models::mood_record::{MoodRecord, StoredRecord};

/// Process-local document collection, kept in insertion order.
#[derive(Default)]
pub struct MemoryRecordStore {
    documents: RwLock<Vec<(Uuid, Value)>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document as-is, bypassing record encoding.
    pub async fn insert_document(&self, document: Value) -> Uuid {
        let id = Uuid::new_v4();
        self.documents.write().await.push((id, document));
        id
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: &MoodRecord) -> Result<String, StoreError> {
        let document = record.to_document()?;
        Ok(self.insert_document(document).await.to_string())
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<StoredRecord>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let documents = self.documents.read().await;
        Ok(decode_documents(documents.iter().take(limit).cloned()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        let id = parse_record_id(id)?;
        let documents = self.documents.read().await;
        documents
            .iter()
            .find(|(doc_id, _)| *doc_id == id)
            .map(|(doc_id, document)| decode_document(*doc_id, document.clone()))
            .transpose()
    }

    async fn find_all_for_scan(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let documents = self.documents.read().await;
        Ok(decode_documents(documents.iter().cloned()))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.len().await as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
