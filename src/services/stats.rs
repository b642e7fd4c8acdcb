//! Mood aggregation over the whole collection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::mood_record::StoredRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodStats {
    /// Every stored document, including ones that could not be decoded
    pub total_records: u64,
    pub average_mood: f64,
    /// Count per mood value; every key 1-5 is present even when zero
    pub mood_distribution: BTreeMap<i32, u64>,
}

/// Aggregates the decoded `records` of a collection holding `total_documents`.
///
/// Returns `None` when the collection is empty. The mean covers every decoded
/// mood; only values 1-5 land in the distribution.
pub fn summarize(total_documents: u64, records: &[StoredRecord]) -> Option<MoodStats> {
    if total_documents == 0 {
        return None;
    }

    let mut mood_distribution: BTreeMap<i32, u64> = (1..=5).map(|m| (m, 0)).collect();
    let mut sum: i64 = 0;

    for stored in records {
        let mood = stored.record.mood;
        sum += i64::from(mood);
        if let Some(count) = mood_distribution.get_mut(&mood) {
            *count += 1;
        }
    }

    let average_mood = if records.is_empty() {
        0.0
    } else {
        sum as f64 / records.len() as f64
    };

    Some(MoodStats {
        total_records: total_documents,
        average_mood,
        mood_distribution,
    })
}
