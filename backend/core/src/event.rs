use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// An object-finalized notification from the storage trigger.
///
/// Only `bucket` and `name` drive processing. The remaining fields are what
/// the storage service attaches to every notification and are kept for logs;
/// a value of the wrong shape decodes as `None` instead of rejecting the event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Decimal string, as the storage service reports it.
    #[serde(default, deserialize_with = "decimal", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "decimal", skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
}

/// Why a storage event was rejected before any work was done.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidEvent {
    #[error("Missing bucket parameter")]
    MissingBucket,

    #[error("Missing name parameter")]
    MissingName,

    #[error("event payload is not a storage object record: {0}")]
    Malformed(String),
}

/// A storage object whose bucket and name are both known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub name: String,
}

impl StorageEvent {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Decode a trigger payload.
    ///
    /// Accepts the bare object record (CloudEvents binary mode, legacy
    /// background functions) as well as a structured-mode CloudEvent whose
    /// `data` member holds the record.
    pub fn from_payload(payload: Value) -> Result<Self, InvalidEvent> {
        let record = match payload {
            Value::Object(mut map) if map.contains_key("specversion") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        if !record.is_object() {
            return Err(InvalidEvent::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&record)
            )));
        }
        serde_json::from_value(record).map_err(|e| InvalidEvent::Malformed(e.to_string()))
    }

    /// Check that both the bucket and the object name are present.
    ///
    /// Empty strings count as missing.
    pub fn validate(&self) -> Result<ObjectRef, InvalidEvent> {
        let bucket = non_empty(&self.bucket).ok_or(InvalidEvent::MissingBucket)?;
        let name = non_empty(&self.name).ok_or(InvalidEvent::MissingName)?;
        Ok(ObjectRef {
            bucket: bucket.to_string(),
            name: name.to_string(),
        })
    }
}

impl ObjectRef {
    /// Name of the JSON result object written for this image.
    pub fn result_name(&self) -> String {
        format!("{}.json", self.name)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Accepts both `"48213"` and `48213`.
fn decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
