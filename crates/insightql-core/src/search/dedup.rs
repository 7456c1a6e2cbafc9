//! Collapse chunk-level hits to one hit per document

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Search response rebuilt around the deduplicated hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultEnvelope {
    pub took: u64,
    pub timed_out: bool,
    #[serde(rename = "_shards")]
    pub shards: Value,
    pub hits: HitsEnvelope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitsEnvelope {
    pub total: TotalHits,
    pub max_score: Option<f64>,
    pub hits: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: usize,
    pub relation: String,
}

impl SearchResultEnvelope {
    /// Keep the first hit for each `_source.doc_id`, in order.
    ///
    /// Hits whose `doc_id` is missing, null, zero, `false` or empty are dropped.
    pub fn from_response(response: &Map<String, Value>) -> Self {
        let hits_data = response.get("hits");
        let all_hits = hits_data
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let unique: Vec<Value> = all_hits
            .iter()
            .filter(|hit| match hit.get("_source").and_then(|s| s.get("doc_id")) {
                Some(doc_id) if is_truthy(doc_id) => seen.insert(DocKey::from(doc_id)),
                _ => false,
            })
            .cloned()
            .collect();

        tracing::info!("Unique docs count: {}", unique.len());

        Self {
            took: response.get("took").and_then(Value::as_u64).unwrap_or(0),
            timed_out: response
                .get("timed_out")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            shards: response
                .get("_shards")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            hits: HitsEnvelope {
                total: TotalHits {
                    value: unique.len(),
                    relation: "eq".to_string(),
                },
                max_score: hits_data
                    .and_then(|h| h.get("max_score"))
                    .and_then(Value::as_f64),
                hits: unique,
            },
        }
    }
}

/// Deduplicate a raw search response by `_source.doc_id`.
///
/// Anything that is not an object with a `hits` key is returned untouched.
pub fn get_unique_docs(response: Value) -> Value {
    match response {
        Value::Object(ref map) if map.contains_key("hits") => {
            let envelope = SearchResultEnvelope::from_response(map);
            serde_json::to_value(envelope).unwrap_or(response)
        }
        other => other,
    }
}

/// Dedup identity of a `doc_id`: numbers by value, everything else by JSON text
#[derive(Debug, PartialEq, Eq, Hash)]
enum DocKey {
    Number(u64),
    Text(String),
}

impl From<&Value> for DocKey {
    fn from(value: &Value) -> Self {
        match value.as_f64() {
            Some(n) => DocKey::Number(n.to_bits()),
            None => DocKey::Text(value.to_string()),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
