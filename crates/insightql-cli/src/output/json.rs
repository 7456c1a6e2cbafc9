//! JSON output formatter

use serde::Serialize;
use serde_json::Value;

/// Single-line JSON
pub fn format_value(value: &Value) -> String {
    value.to_string() + "\n"
}

pub fn format_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()) + "\n"
}

pub fn format_serializable<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
