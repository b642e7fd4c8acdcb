use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{HealthResponse, ReadyzChecks, ReadyzResponse, RootResponse};
use crate::error::AppError;
use crate::AppState;

pub const SERVICE_NAME: &str = "EmoGo Backend API";

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let db_status = if state.repo.is_connected() {
        "connected"
    } else {
        "demo_mode"
    };

    Json(RootResponse {
        message: SERVICE_NAME.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        status: "running".into(),
        db_status: db_status.into(),
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        service: "emogo-api".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyzResponse>) {
    let database = match state.repo.ping().await {
        Ok(()) => "ok",
        Err(AppError::StorageUnavailable) => "demo_mode",
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            "failed"
        }
    };

    let (status, label) = if database == "ok" {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        status,
        Json(ReadyzResponse {
            status: label.into(),
            checks: ReadyzChecks {
                database: database.into(),
            },
        }),
    )
}
