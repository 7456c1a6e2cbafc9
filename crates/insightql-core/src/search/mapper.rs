//! Projection of search hits onto renamed fields

use crate::error::{InsightError, Result};
use serde_json::{Map, Value};

/// Project `_source.<fields[i]>` of every hit to a record keyed by `names[i]`.
///
/// `hits` must be a non-empty array of objects and both lists must have the
/// same length. Fields missing from a hit become `null`.
pub fn map_hits(hits: Option<&Value>, fields: &[String], names: &[String]) -> Result<Vec<Value>> {
    let hits = validate_hits(hits)?;

    if fields.len() != names.len() {
        return Err(InsightError::InvalidData(format!(
            "Lists should be equal in length: {} != {}",
            fields.len(),
            names.len()
        )));
    }

    let mapped = hits
        .iter()
        .map(|hit| {
            let source = hit.get("_source");
            let record: Map<String, Value> = fields
                .iter()
                .zip(names)
                .map(|(field, name)| {
                    let value = source
                        .and_then(|s| s.get(field))
                        .cloned()
                        .unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect();
            Value::Object(record)
        })
        .collect();

    Ok(mapped)
}

fn validate_hits(hits: Option<&Value>) -> Result<&Vec<Value>> {
    let hits = hits.ok_or_else(|| InsightError::InvalidData("No data provided".to_string()))?;

    let list = hits.as_array().ok_or_else(|| {
        InsightError::InvalidData(format!("Expected a list of hits, got {}", type_name(hits)))
    })?;

    if list.is_empty() {
        return Err(InsightError::InvalidData("Hit list is empty".to_string()));
    }

    if let Some((index, item)) = list.iter().enumerate().find(|(_, item)| !item.is_object()) {
        return Err(InsightError::InvalidData(format!(
            "Non-object items found at index {}: {}",
            index,
            type_name(item)
        )));
    }

    Ok(list)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
