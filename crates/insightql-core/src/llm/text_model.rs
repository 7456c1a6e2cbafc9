//! Text completion through the retrying invoker

use super::retry::{RetryPolicy, RetryingInvoker};
use super::runtime::ModelRuntime;
use crate::config::ModelServiceConfig;
use crate::error::{InsightError, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Single-prompt text completion
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    fn model_id(&self) -> &str;
}

/// Anthropic messages model served by a Bedrock-style runtime
pub struct BedrockTextModel {
    invoker: RetryingInvoker,
    model_id: String,
    max_tokens: u32,
    temperature: f32,
}

impl BedrockTextModel {
    pub fn new(runtime: Arc<dyn ModelRuntime>, model_id: impl Into<String>) -> Self {
        Self {
            invoker: RetryingInvoker::new(runtime, RetryPolicy::default()),
            model_id: model_id.into(),
            max_tokens: 2000,
            temperature: 0.0,
        }
    }

    /// Create from configuration
    pub fn from_config(runtime: Arc<dyn ModelRuntime>, config: &ModelServiceConfig) -> Self {
        Self::new(runtime, config.llm_model.clone())
            .with_policy(config.retry_policy())
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature)
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.invoker = self.invoker.with_policy(policy);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_payload(&self, prompt: &str) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("anthropic_version".into(), json!(ANTHROPIC_VERSION));
        payload.insert("max_tokens".into(), json!(self.max_tokens));
        payload.insert("temperature".into(), json!(self.temperature));
        payload.insert(
            "messages".into(),
            json!([{
                "role": "user",
                "content": [{"type": "text", "text": prompt}]
            }]),
        );
        payload
    }
}

#[async_trait]
impl TextModel for BedrockTextModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let payload = self.build_payload(prompt);
        self.invoker
            .invoke_with_retry_map(&self.model_id, &payload, extract_completion_text)
            .await
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Concatenate the `text` blocks of a messages-API response
fn extract_completion_text(body: Value) -> Result<String> {
    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| InsightError::MissingField("content".to_string()))?;

    let text: String = blocks
        .iter()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(InsightError::Llm("Model returned no text content".to_string()));
    }
    Ok(text)
}
