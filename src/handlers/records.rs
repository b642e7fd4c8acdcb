use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::dto::{CreateRecordResponse, ListRecordsQuery, RecordListResponse};
use crate::error::{AppError, AppResult};
use crate::models::mood_record::StoredRecord;
use crate::validation::validate_record;
use crate::AppState;

pub async fn create_record(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<CreateRecordResponse>> {
    let Json(payload) = body?;
    let record = validate_record(&payload, Utc::now())?;

    let id = state.repo.insert(&record).await?;

    Ok(Json(CreateRecordResponse {
        id,
        message: "Record created successfully".into(),
        data: record,
    }))
}

pub async fn list_records(
    State(state): State<AppState>,
    query: Result<Query<ListRecordsQuery>, QueryRejection>,
) -> AppResult<Json<RecordListResponse>> {
    let Query(query) = query?;
    let limit = query
        .resolve_limit(state.config.default_record_limit)
        .map_err(AppError::BadRequest)?;

    let records = state.repo.find_all(limit).await?;

    Ok(Json(RecordListResponse {
        count: records.len(),
        records,
    }))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> AppResult<Json<StoredRecord>> {
    let record = state.repo.find_by_id(&record_id).await?;
    Ok(Json(record))
}
