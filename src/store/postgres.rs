use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{decode_document, decode_documents, parse_record_id, RecordStore, StoreError};
use crate::models::mood_record::{MoodRecord, StoredRecord};

/// Document collection backed by the `mood_records` JSONB table.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    document: Json<Value>,
}

impl DocumentRow {
    fn into_parts(self) -> (Uuid, Value) {
        (self.id, self.document.0)
    }
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, record: &MoodRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4();
        let document = record.to_document()?;

        sqlx::query("INSERT INTO mood_records (id, document) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(document))
            .execute(&self.pool)
            .await?;

        Ok(id.to_string())
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<StoredRecord>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, document FROM mood_records LIMIT $1",
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_documents(rows.into_iter().map(DocumentRow::into_parts)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        let id = parse_record_id(id)?;

        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, document FROM mood_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let (id, document) = row.into_parts();
            decode_document(id, document)
        })
        .transpose()
    }

    async fn find_all_for_scan(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>("SELECT id, document FROM mood_records")
            .fetch_all(&self.pool)
            .await?;

        Ok(decode_documents(rows.into_iter().map(DocumentRow::into_parts)))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mood_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
