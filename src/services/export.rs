//! CSV rendering for the record export endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::mood_record::StoredRecord;

pub const CSV_FILENAME: &str = "mood_records.csv";

pub const CSV_COLUMNS: [&str; 7] = [
    "id",
    "mood",
    "activity",
    "longitude",
    "latitude",
    "video_url",
    "created_at",
];

// Field order must match CSV_COLUMNS.
#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    mood: i32,
    activity: Option<&'a str>,
    longitude: f64,
    latitude: f64,
    video_url: Option<&'a str>,
    created_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a StoredRecord> for CsvRow<'a> {
    fn from(stored: &'a StoredRecord) -> Self {
        let r = &stored.record;
        Self {
            id: &stored.id,
            mood: r.mood,
            activity: r.activity.as_deref(),
            longitude: r.longitude,
            latitude: r.latitude,
            video_url: r.video_url.as_deref(),
            created_at: r.created_at,
        }
    }
}

/// Writes a header row followed by one row per record.
///
/// Absent optional fields become empty cells.
pub fn records_to_csv(records: &[StoredRecord]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for stored in records {
        writer.serialize(CsvRow::from(stored))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}
