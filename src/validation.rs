//! Boundary validation for incoming mood records.
//!
//! Payloads arrive as untyped JSON so that a type mismatch can be reported
//! against the field that caused it. Each field is coerced on its own, then
//! the assembled [`MoodRecord`] is checked against its `validator` rules.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::models::mood_record::MoodRecord;

/// A validation failure pinned to the offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn from_validation(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let Some((field, errs)) = field_errors.into_iter().next() else {
            return Self::new("body", "Invalid record");
        };
        let message = errs
            .first()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code))
            })
            .unwrap_or_else(|| "Invalid value".to_string());
        Self::new(field, message)
    }
}

/// Builds a [`MoodRecord`] from a raw request body.
///
/// `created_at` falls back to `now`, so the default timestamp reflects when
/// the payload was validated rather than when it was written to the store.
pub fn validate_record(payload: &Value, now: DateTime<Utc>) -> Result<MoodRecord, FieldError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| FieldError::new("body", "Request body must be a JSON object"))?;

    let record = MoodRecord {
        mood: required(obj, "mood", parse_integer)?,
        activity: optional(obj, "activity", parse_text)?,
        longitude: required(obj, "longitude", parse_number)?,
        latitude: required(obj, "latitude", parse_number)?,
        video_url: optional(obj, "video_url", parse_text)?,
        created_at: Some(optional(obj, "created_at", parse_timestamp)?.unwrap_or(now)),
    };

    record.validate().map_err(FieldError::from_validation)?;
    Ok(record)
}

fn required<T>(
    obj: &Map<String, Value>,
    field: &str,
    parse: fn(&Value) -> Result<T, String>,
) -> Result<T, FieldError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(FieldError::new(field, "Field required")),
        Some(value) => parse(value).map_err(|message| FieldError::new(field, message)),
    }
}

fn optional<T>(
    obj: &Map<String, Value>,
    field: &str,
    parse: fn(&Value) -> Result<T, String>,
) -> Result<Option<T>, FieldError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .map_err(|message| FieldError::new(field, message)),
    }
}

fn parse_integer(value: &Value) -> Result<i32, String> {
    const NOT_INTEGER: &str = "Input should be a valid integer";

    let wide = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
                    _ => return Err(NOT_INTEGER.into()),
                }
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| NOT_INTEGER.to_string())?,
        _ => return Err(NOT_INTEGER.into()),
    };

    i32::try_from(wide).map_err(|_| NOT_INTEGER.to_string())
}

fn parse_number(value: &Value) -> Result<f64, String> {
    const NOT_NUMBER: &str = "Input should be a valid number";

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(NOT_NUMBER.into()),
    }
}

fn parse_text(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| "Input should be a valid string".to_string())
}

fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, String> {
    const NOT_DATETIME: &str = "Input should be a valid datetime";

    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
                .ok_or_else(|| NOT_DATETIME.to_string())
        }
        Value::Number(n) => {
            let secs = n.as_f64().ok_or_else(|| NOT_DATETIME.to_string())?;
            if !secs.is_finite() {
                return Err(NOT_DATETIME.into());
            }
            // floor keeps the sub-second remainder non-negative for pre-epoch values
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9).round() as u32;
            DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
                .ok_or_else(|| NOT_DATETIME.to_string())
        }
        _ => Err(NOT_DATETIME.into()),
    }
}
