//! Field codec shared by every resource kind
//!
//! Requests carry form-encoded fields; responses are JSON. The API is loose
//! about JSON types: integers sometimes arrive as strings, strings sometimes
//! arrive as `null`. The helpers here absorb that so resource structs can use
//! plain `u32` / `String` fields.

use crate::error::{Error, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flatten a serializable struct into form fields
///
/// `null` values (unset `Option`s) are dropped. Numbers and booleans are
/// rendered with their JSON text.
pub fn form_pairs<T: Serialize + ?Sized>(fields: &T) -> Result<Vec<(String, String)>> {
    match serde_json::to_value(fields)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::Other(format!(
            "form fields must serialize to an object, got: {}",
            other
        ))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrString::Number(n)) => Ok(n),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(0),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected an integer, got {:?}", s))),
    }
}

/// Accept a JSON number, numeric string, or null as `u32`
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = lenient_u64(deserializer)?;
    u32::try_from(n).map_err(|_| de::Error::custom(format!("integer out of range: {}", n)))
}

/// Accept a JSON number, numeric string, or null as `u8`
pub(crate) fn lenient_u8<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let n = lenient_u64(deserializer)?;
    u8::try_from(n).map_err(|_| de::Error::custom(format!("integer out of range: {}", n)))
}

/// Accept a JSON string or null as `String`
pub(crate) fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
