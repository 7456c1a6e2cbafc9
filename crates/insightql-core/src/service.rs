//! Request handling for query generation and insight search

use crate::config::Config;
use crate::error::{InsightError, Result};
use crate::llm::{BedrockTextModel, HttpModelRuntime, ModelRuntime, TextModel};
use crate::query::QueryGenerator;
use crate::search::{get_unique_docs, HttpSearchBackend, SearchBackend};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const SEARCH_COMPLETED: &str = "Search completed successfully";

/// Incoming natural language question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Result of [`InsightService::search_insights`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub message: String,
    pub user_query: QueryRequest,
    pub query_params: Value,
    pub results: Value,
}

/// Query generation plus search against one index
#[derive(Clone)]
pub struct InsightService {
    generator: QueryGenerator,
    backend: Arc<dyn SearchBackend>,
    index: String,
    size: usize,
}

impl InsightService {
    pub fn new(
        generator: QueryGenerator,
        backend: Arc<dyn SearchBackend>,
        index: impl Into<String>,
        size: usize,
    ) -> Self {
        Self {
            generator,
            backend,
            index: index.into(),
            size,
        }
    }

    /// Wire the HTTP model runtime and search backend described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let runtime: Arc<dyn ModelRuntime> = Arc::new(HttpModelRuntime::new(&config.model_service)?);
        let model: Arc<dyn TextModel> =
            Arc::new(BedrockTextModel::from_config(runtime, &config.model_service));
        let backend = Arc::new(HttpSearchBackend::new(&config.search)?);

        Ok(Self::new(
            QueryGenerator::from_config(model, config),
            backend,
            config.search.index.clone(),
            config.search.size,
        ))
    }

    /// Search `index` instead, and describe it as such in the prompt
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        let index = index.into();
        self.generator = self.generator.with_index_name(index.clone());
        self.index = index;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Generated query body for the request
    pub async fn search_query(&self, request: &QueryRequest) -> Result<Value> {
        let text = validate_request(request)?;
        Ok(self.generator.generate_query(text).await)
    }

    /// Generate a query, run it and deduplicate the hits
    pub async fn search_insights(&self, request: &QueryRequest) -> Result<InsightsResponse> {
        let text = validate_request(request)?;
        let query_params = self.generator.generate_query(text).await;
        tracing::debug!(index = %self.index, "Executing query: {}", query_params);

        let raw = self
            .backend
            .search(&self.index, &query_params, Some(self.size))
            .await?;

        Ok(InsightsResponse {
            message: SEARCH_COMPLETED.to_string(),
            user_query: request.clone(),
            query_params,
            results: get_unique_docs(raw),
        })
    }

    /// `{"status": "ok" | "down", "opensearch": <status>}`, or
    /// `{"status": "error", "error": ...}` when the cluster can't be reached
    pub async fn health_check(&self) -> Value {
        match self.backend.cluster_health().await {
            Ok(health) => {
                let status = if health.is_available() { "ok" } else { "down" };
                json!({ "status": status, "opensearch": health.status })
            }
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                json!({ "status": "error", "error": e.to_string() })
            }
        }
    }
}

/// `{"error": "<message>"}` body returned in place of a result
pub fn error_payload(err: &InsightError) -> Value {
    json!({ "error": err.to_string() })
}

fn validate_request(request: &QueryRequest) -> Result<&str> {
    let text = request.query.trim();
    if text.is_empty() {
        return Err(InsightError::InvalidInput("query must not be empty".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_payload_wraps_message() {
        let err = InsightError::Search("index not found".into());
        assert_eq!(
            error_payload(&err),
            json!({"error": "Search error: index not found"})
        );
    }

    #[test]
    fn blank_query_rejected() {
        assert!(validate_request(&QueryRequest::new("  ")).is_err());
        assert_eq!(validate_request(&QueryRequest::new(" q ")).unwrap(), "q");
    }

    #[test]
    fn response_serializes_user_query_object() {
        let response = InsightsResponse {
            message: SEARCH_COMPLETED.into(),
            user_query: QueryRequest::new("x"),
            query_params: json!({}),
            results: json!({}),
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["user_query"], json!({"query": "x"}));
    }
}
