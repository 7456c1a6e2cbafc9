//! Remote model runtime (Bedrock-style `invoke` endpoint)

use crate::config::ModelServiceConfig;
use crate::error::{InsightError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const APPLICATION_JSON: &str = "application/json";

/// A single invocation of a hosted model
#[derive(Debug, Clone)]
pub struct InvokeModelRequest<'a> {
    pub model_id: &'a str,
    /// Serialized request body
    pub body: String,
    pub content_type: &'a str,
    pub accept: &'a str,
}

impl<'a> InvokeModelRequest<'a> {
    /// JSON-in, JSON-out request
    pub fn json(model_id: &'a str, body: String) -> Self {
        Self {
            model_id,
            body,
            content_type: APPLICATION_JSON,
            accept: APPLICATION_JSON,
        }
    }
}

/// Trait for remote inference runtimes
///
/// Implementations perform exactly one call and return the fully read
/// response body. Retrying is the caller's concern.
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    async fn invoke_model(&self, request: InvokeModelRequest<'_>) -> Result<Vec<u8>>;
}

/// HTTP model runtime
///
/// Posts to `{url}/model/{model_id}/invoke`, the path layout used by the
/// Bedrock runtime API and by compatible gateways.
pub struct HttpModelRuntime {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpModelRuntime {
    /// Create from configuration
    pub fn new(config: &ModelServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(InsightError::Http)?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn invoke_url(&self, model_id: &str) -> String {
        format!("{}/model/{}/invoke", self.base_url, model_id)
    }
}

#[async_trait]
impl ModelRuntime for HttpModelRuntime {
    async fn invoke_model(&self, request: InvokeModelRequest<'_>) -> Result<Vec<u8>> {
        let url = self.invoke_url(request.model_id);
        tracing::debug!("Invoking model {} at {}", request.model_id, url);

        let mut req = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, request.content_type)
            .header(reqwest::header::ACCEPT, request.accept)
            .body(request.body);

        if let Some(ref api_key) = self.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::ExternalError(format!(
                "Model runtime error (HTTP {}): {}",
                status, body
            )));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
