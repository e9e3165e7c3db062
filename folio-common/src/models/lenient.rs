//! Forgiving deserializers for loosely-shaped third-party payloads
//!
//! Upstream APIs mix numbers and numeric strings, send `null` where a list
//! is expected, and sometimes collapse one-element arrays into a bare object.
//! These helpers never fail; anything unusable becomes `None` or is dropped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String or number → `Some(String)`; anything else → `None`
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_to_string(&v)))
}

/// Unsigned integer or numeric string → `Some(u64)`; anything else → `None`
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_to_u64(&v)))
}

/// List of `T`, dropping elements that do not fit the schema
pub fn vec_of<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| elements(&v)).unwrap_or_default())
}

/// Interpret `value` as a list of `T`
///
/// Arrays are parsed element by element; a single object is treated as a
/// one-element list; anything else is empty.
pub fn elements<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        Value::Object(_) => serde_json::from_value(value.clone())
            .map(|item| vec![item])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Trimmed, non-empty string
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
