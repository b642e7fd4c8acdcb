//! # EmoGo — Request/Response DTOs
//!
//! API contract types shared by the handlers.
//!
//! Conventions:
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Record bodies are validated in `crate::validation`, not here

use serde::{Deserialize, Serialize};

use crate::models::mood_record::{MoodRecord, StoredRecord};
use crate::services::stats::MoodStats;

// ============================================================================
// Common
// ============================================================================

/// Standard informational message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Records
// ============================================================================

/// POST /api/records
#[derive(Debug, Serialize)]
pub struct CreateRecordResponse {
    pub id: String,
    pub message: String,
    pub data: MoodRecord,
}

/// GET /api/records query params
#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsQuery {
    /// Maximum number of records. Default comes from config (100).
    pub limit: Option<i64>,
}

impl ListRecordsQuery {
    /// Resolve the effective limit, rejecting negative values
    pub fn resolve_limit(&self, default: i64) -> Result<i64, String> {
        match self.limit {
            None => Ok(default),
            Some(n) if n < 0 => Err("limit must be a non-negative integer".into()),
            Some(n) => Ok(n),
        }
    }
}

/// GET /api/records
#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub count: usize,
    pub records: Vec<StoredRecord>,
}

/// POST /api/records/upload/video
#[derive(Debug, Serialize)]
pub struct VideoUploadResponse {
    pub message: String,
    pub filename: Option<String>,
    pub content_type: String,
    pub size_bytes: usize,
    pub note: String,
}

// ============================================================================
// Stats
// ============================================================================

/// GET /api/stats — either the aggregate or a note that nothing exists yet
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatsResponse {
    Summary(MoodStats),
    Empty(MessageResponse),
}

// ============================================================================
// System
// ============================================================================

/// GET /
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
    /// "connected" or "demo_mode"
    pub db_status: String,
}

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: String,
    pub checks: ReadyzChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    /// "ok", "failed" or "demo_mode"
    pub database: String,
}
