//! Terminal output formatter

use insightql_core::InsightsResponse;
use serde_json::Value;

const PREVIEW_VALUES: usize = 8;

pub fn format_insights(response: &InsightsResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!("Query: {}\n", response.user_query.query));
    output.push_str(&format!("DSL:   {}\n", response.query_params));

    let hits = response
        .results
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    output.push_str(&format!("{} unique documents\n", hits.len()));
    if hits.is_empty() {
        return output;
    }
    output.push('\n');

    for hit in hits {
        let source = hit.get("_source");
        let field = |name: &str| {
            source
                .and_then(|s| s.get(name))
                .map(display)
                .unwrap_or_default()
        };
        let score = hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0);

        output.push_str(&format!("{:>6.3} #{} {}\n", score, field("doc_id"), field("title")));

        let tag = field("tag");
        if !tag.is_empty() {
            output.push_str(&format!("       tag: {}\n", tag));
        }
        let url = field("url");
        if !url.is_empty() {
            output.push_str(&format!("       {}\n", url));
        }
    }

    output
}

pub fn format_records(records: &[Value]) -> String {
    let mut output = String::new();

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        if let Some(map) = record.as_object() {
            let width = map.keys().map(String::len).max().unwrap_or(0);
            for (key, value) in map {
                output.push_str(&format!("{:<width$}  {}\n", key, display(value), width = width));
            }
        }
    }

    output
}

pub fn format_embedding(model_id: &str, vector: &[f32]) -> String {
    let preview: Vec<String> = vector
        .iter()
        .take(PREVIEW_VALUES)
        .map(|x| format!("{:.6}", x))
        .collect();
    let ellipsis = if vector.len() > PREVIEW_VALUES { ", ..." } else { "" };

    format!(
        "{} ({} dimensions)\n[{}{}]\n",
        model_id,
        vector.len(),
        preview.join(", "),
        ellipsis
    )
}

/// Strings without quotes, null as empty, everything else as JSON
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
