//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use insightql_core::InsightsResponse;
use serde_json::Value;

/// Format an arbitrary JSON document
pub fn format_value(value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(value),
        OutputFormat::Cli => json::format_pretty(value),
    }
}

/// Format a `search` result
pub fn format_insights(response: &InsightsResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_serializable(response),
        OutputFormat::Cli => terminal::format_insights(response),
    }
}

/// Format projected hit records
pub fn format_records(records: &[Value], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_serializable(&records),
        OutputFormat::Cli => terminal::format_records(records),
    }
}

/// Format an embedding vector
pub fn format_embedding(model_id: &str, vector: &[f32], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(&serde_json::json!({
            "model_id": model_id,
            "dimensions": vector.len(),
            "embedding": vector,
        })),
        OutputFormat::Cli => terminal::format_embedding(model_id, vector),
    }
}
