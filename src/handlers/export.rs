use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::AppResult;
use crate::services::export::{records_to_csv, CSV_FILENAME};
use crate::AppState;

pub async fn export_csv(State(state): State<AppState>) -> AppResult<Response> {
    let records = state.repo.export_scan().await?;
    let body = records_to_csv(&records)?;

    tracing::info!(rows = records.len(), "Exported mood records as CSV");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", CSV_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
