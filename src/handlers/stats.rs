use axum::{extract::State, Json};

use crate::dto::{MessageResponse, StatsResponse};
use crate::error::AppResult;
use crate::services::stats::summarize;
use crate::AppState;

pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let total = state.repo.count().await?;
    let records = state.repo.find_all_for_scan().await?;

    let response = match summarize(total, &records) {
        Some(stats) => StatsResponse::Summary(stats),
        None => StatsResponse::Empty(MessageResponse {
            message: "No records available".into(),
        }),
    };

    Ok(Json(response))
}
