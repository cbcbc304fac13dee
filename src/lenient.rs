//! Forgiving serde helpers for hand-edited documents.
//!
//! Storyboard files and clip metadata are written by several tools over the
//! years. A field holding the wrong type is treated the same as a missing
//! field instead of failing the whole conversion.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes an optional field, mapping `null` and type mismatches to `None`.
///
/// Use together with `#[serde(default)]` so absent keys are `None` as well.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value(value))
}

/// Like [`optional`] for fields that fall back to their type's default.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    optional(deserializer).map(Option::unwrap_or_default)
}

/// Converts an already-parsed value, discarding it on mismatch.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value).ok()
}
