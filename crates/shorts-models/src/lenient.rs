//! Field deserializers for stored records.
//!
//! Records are written by several generations of clients. A field with an
//! unusable value reads as absent, so the record's default applies instead
//! of the whole document failing to load.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::scene::Toggle;

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// A finite number, also accepted as a numeric string.
pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

/// Any string; other JSON types read as absent.
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// A bool, a number, or either written as a string.
pub(crate) fn optional_toggle<'de, D>(deserializer: D) -> Result<Option<Toggle>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let toggle = match &value {
        Value::Bool(on) => Some(Toggle::Bool(*on)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => Some(Toggle::Bool(true)),
            "false" | "off" | "no" | "" => Some(Toggle::Bool(false)),
            _ => number(&value).map(Toggle::Number),
        },
        _ => number(&value).map(Toggle::Number),
    };
    Ok(toggle)
}

/// A percentage clamped to 0..=100; unusable values read as absent.
pub(crate) fn optional_percent<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.map(|n| n.round().clamp(0.0, 100.0) as u8))
}
