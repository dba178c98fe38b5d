//! Lenient numeric decoding for wire payloads.
//!
//! Form inputs arrive as numbers or as strings. Anything that is not a
//! finite number decodes as absent; decoding itself never fails.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a finite number.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// `deserialize_with` adapter for `Option<f64>` fields.
///
/// Pair with `#[serde(default)]` so a missing key is also `None`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value))
}

/// `deserialize_with` adapter for a nested `Option<T>` object.
///
/// Anything but a JSON object, or an object `T` cannot take, is `None`.
pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// `deserialize_with` adapter for a list field. Anything but an array is
/// an empty list; entries are kept as given.
pub fn list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}
