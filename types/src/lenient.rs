//! Field decoders for externally produced JSON.
//!
//! A field with an unexpected shape degrades to its default instead of
//! failing the whole document. Used with `#[serde(deserialize_with = ...)]`.

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::Value;

/// Decode the field, or `T::default()` when its value has the wrong shape.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decode an array, skipping elements that don't fit `T`. Anything other
/// than an array (including `null`) is empty.
pub(crate) fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}
