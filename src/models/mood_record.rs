use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single mood entry as persisted in the document collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MoodRecord {
    /// Mood score 1-5 (1=very bad, 5=very good)
    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood: i32,
    #[serde(default)]
    pub activity: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    /// Reference to externally stored media, never dereferenced here
    #[serde(default)]
    pub video_url: Option<String>,
    /// Always set on records created through the API; may be absent on
    /// documents written by other clients
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl MoodRecord {
    /// Converts an untyped stored document back into the record schema.
    ///
    /// Unknown keys are ignored and missing optional fields default to `None`.
    pub fn from_document(document: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(document)
    }

    pub fn to_document(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A record together with the identifier the store assigned at insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: String,
    #[serde(flatten)]
    pub record: MoodRecord,
}
