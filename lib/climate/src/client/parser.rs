use super::Error;
use crate::Result;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub fn parse_temperature(body: &[u8]) -> Result<f64> {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::Temperature(text.into_owned())),
    }
}

/// Keys are matched case-insensitively: every object key is lowercased before
/// deserializing, so DTO fields are declared with lowercase names.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(body)?;
    let value = serde_json::from_value(lowercase_keys(value))?;
    Ok(value)
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}
