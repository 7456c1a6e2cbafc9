//! Natural language to OpenSearch query body

use super::prompt::PromptComposer;
use super::response_parser::{extract_json, snippet};
use super::validator::{default_query, is_valid_query, validate_or_default};
use crate::config::Config;
use crate::llm::TextModel;
use serde_json::Value;
use std::sync::Arc;

/// Turns user questions into query bodies through a text model
#[derive(Clone)]
pub struct QueryGenerator {
    model: Arc<dyn TextModel>,
    composer: PromptComposer,
}

impl QueryGenerator {
    pub fn new(model: Arc<dyn TextModel>, composer: PromptComposer) -> Self {
        Self { model, composer }
    }

    pub fn from_config(model: Arc<dyn TextModel>, config: &Config) -> Self {
        Self::new(model, PromptComposer::from_config(config))
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.composer = self.composer.with_index_name(index_name);
        self
    }

    /// Generate a query body for `user_query`.
    ///
    /// Never fails: model errors and unusable output both yield
    /// `{"query": {"match_all": {}}}`.
    pub async fn generate_query(&self, user_query: &str) -> Value {
        let prompt = self.composer.compose(user_query);

        let response = match self.model.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(model_id = self.model.model_id(), "Error generating search query: {}", e);
                return default_query();
            }
        };
        tracing::info!("LLM response (first 500 chars): {}", snippet(&response, 500));

        let parsed = extract_json(&response);
        if !is_valid_query(&parsed) {
            tracing::warn!(
                "Invalid query generated, using match_all. Response: {}",
                snippet(&response, 200)
            );
        }
        validate_or_default(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InsightError, Result};
    use crate::query::Vocabulary;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedModel {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(InsightError::ModelInvocationExhausted {
                    model_id: "stub".into(),
                    attempts: 3,
                }),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextModel for CannedModel {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(InsightError::Llm(e.to_string())),
            }
        }

        fn model_id(&self) -> &str {
            "stub"
        }
    }

    fn generator(model: Arc<CannedModel>) -> QueryGenerator {
        QueryGenerator::new(
            model,
            PromptComposer::new(Vocabulary::default(), "embed-v2", "ei_articles_index"),
        )
    }

    #[tokio::test]
    async fn term_query_is_returned() {
        let model = CannedModel::ok(r#"{"query": {"term": {"tag": "Current"}}}"#);
        let query = generator(model.clone())
            .generate_query("Show me all articles tagged as Current")
            .await;

        assert_eq!(query, json!({"query": {"term": {"tag": "Current"}}}));
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("USER QUERY: Show me all articles tagged as Current"));
        assert!(prompts[0].contains("\"model_id\": \"embed-v2\""));
    }

    #[tokio::test]
    async fn fenced_knn_query_is_returned() {
        let model = CannedModel::ok(
            "```json\n{\"knn\": {\"field\": \"chunk_vector\", \"k\": 10}}\n```",
        );
        let query = generator(model).generate_query("climate change").await;
        assert_eq!(query["knn"]["field"], "chunk_vector");
    }

    #[tokio::test]
    async fn prose_reply_falls_back() {
        let model = CannedModel::ok("I'm not sure what you mean.");
        let query = generator(model).generate_query("???").await;
        assert_eq!(query, default_query());
    }

    #[tokio::test]
    async fn model_failure_falls_back() {
        let query = generator(CannedModel::failing())
            .generate_query("anything")
            .await;
        assert_eq!(query, default_query());
    }
}
