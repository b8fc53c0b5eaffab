use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One journal line.
///
/// Field order is the on-disk order: `timestamp`, `event`, `id`, `type`,
/// `data`. The id is written as a decimal string and read back from either
/// a string or a JSON integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// ISO-8601 timestamp supplied by the caller.
    pub timestamp: String,
    /// Event name.
    pub event: String,
    /// Monotonic entry id, unique per journal.
    #[serde(serialize_with = "id_as_string", deserialize_with = "id_from_any")]
    pub id: u64,
    /// Entry type; `"event"` unless the caller overrides it.
    #[serde(rename = "type")]
    pub kind: String,
    /// Arbitrary payload.
    pub data: Value,
}

impl JournalEntry {
    /// Serializes the entry as a single compact JSON line without the
    /// trailing newline.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Reads an entry id out of a JSON value.
///
/// Accepts non-negative integers and strings holding one (surrounding
/// whitespace allowed). Anything else yields `None`.
pub fn id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn id_as_string<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_string())
}

fn id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid entry id: {}", value)))
}
