//! Query body validation with a match-all fallback

use serde_json::{json, Value};
use tracing::info;

/// Top-level key of a field-based query
pub const QUERY_KEY: &str = "query";
/// Top-level key of a vector similarity query
pub const KNN_KEY: &str = "knn";

/// Shape of a generated query body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    VectorSimilarity,
    FieldBased,
    Invalid,
}

/// `{"query": {"match_all": {}}}`
pub fn default_query() -> Value {
    json!({ "query": { "match_all": {} } })
}

pub fn classify(body: &Value) -> QueryKind {
    let Some(map) = body.as_object() else {
        return QueryKind::Invalid;
    };
    if map.contains_key(KNN_KEY) {
        QueryKind::VectorSimilarity
    } else if map.contains_key(QUERY_KEY) {
        QueryKind::FieldBased
    } else {
        QueryKind::Invalid
    }
}

/// A body is usable when it is an object with a `query` or `knn` key
pub fn is_valid_query(body: &Value) -> bool {
    classify(body) != QueryKind::Invalid
}

/// Return `body` unchanged when usable, otherwise [`default_query`]
pub fn validate_or_default(body: Value) -> Value {
    match classify(&body) {
        QueryKind::VectorSimilarity => {
            info!("Generated vector similarity (semantic) search query.");
            body
        }
        QueryKind::FieldBased => {
            info!("Generated field-based query.");
            body
        }
        QueryKind::Invalid => {
            info!("Falling back to match_all query");
            default_query()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_query_passes_through() {
        let body = json!({"query": {"term": {"tag": "Current"}}});
        assert_eq!(classify(&body), QueryKind::FieldBased);
        assert_eq!(validate_or_default(body.clone()), body);
    }

    #[test]
    fn knn_query_passes_through() {
        let body = json!({"knn": {"field": "chunk_vector", "k": 10}});
        assert_eq!(classify(&body), QueryKind::VectorSimilarity);
        assert_eq!(validate_or_default(body.clone()), body);
    }

    #[test]
    fn knn_wins_when_both_keys_present() {
        let body = json!({"knn": {}, "query": {}});
        assert_eq!(classify(&body), QueryKind::VectorSimilarity);
    }

    #[test]
    fn empty_object_falls_back() {
        assert_eq!(validate_or_default(json!({})), default_query());
    }

    #[test]
    fn unrelated_keys_fall_back() {
        assert_eq!(validate_or_default(json!({"size": 5})), default_query());
    }

    #[test]
    fn non_objects_fall_back() {
        assert!(!is_valid_query(&json!([{"query": {}}])));
        assert!(!is_valid_query(&json!("query")));
        assert_eq!(validate_or_default(Value::Null), default_query());
    }

    #[test]
    fn default_is_match_all() {
        assert_eq!(default_query(), json!({"query": {"match_all": {}}}));
    }
}
