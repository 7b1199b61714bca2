//! Type-directed coercion of wire text.
//!
//! Malformed input yields `None` rather than an error, so a garbled
//! required value fails the same required check as a missing one.

use federation_model::{PropertyType, Value};
use federation_types::Timestamp;

/// Converts element text to a scalar of `kind`.
pub(crate) fn scalar_from_text(kind: PropertyType, text: &str) -> Option<Value> {
    match kind {
        PropertyType::String => Some(Value::String(text.to_string())),
        PropertyType::Integer => text.trim().parse::<i64>().ok().map(Value::Integer),
        PropertyType::Boolean => parse_bool(text).map(Value::Boolean),
        PropertyType::Timestamp => Timestamp::parse(text.trim()).ok().map(Value::Timestamp),
        PropertyType::Entity(_) | PropertyType::List(_) => None,
    }
}

/// Converts a JSON scalar to `kind`; typed JSON values pass through.
pub(crate) fn scalar_from_json(kind: PropertyType, value: &serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;

    match (kind, value) {
        (_, Json::Null) => None,
        (PropertyType::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        (PropertyType::Boolean, Json::Bool(b)) => Some(Value::Boolean(*b)),
        (PropertyType::String, Json::Number(n)) => Some(Value::String(n.to_string())),
        (PropertyType::String, Json::Bool(b)) => Some(Value::String(b.to_string())),
        (kind, Json::String(s)) => scalar_from_text(kind, s),
        _ => None,
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
