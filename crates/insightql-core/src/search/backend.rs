//! Search engine access

use crate::config::SearchServiceConfig;
use crate::error::{InsightError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Executes query bodies against an index
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run `body` against `index` and return the raw response document.
    /// `size` overrides the number of hits when given.
    async fn search(&self, index: &str, body: &Value, size: Option<usize>) -> Result<Value>;

    async fn cluster_health(&self) -> Result<ClusterHealth>;
}

/// Subset of `GET _cluster/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterHealth {
    pub status: String,
    #[serde(default)]
    pub cluster_name: Option<String>,
}

impl ClusterHealth {
    /// `green` and `yellow` clusters serve queries
    pub fn is_available(&self) -> bool {
        matches!(self.status.as_str(), "green" | "yellow")
    }
}

/// OpenSearch/Elasticsearch over HTTP (`POST {url}/{index}/_search`)
pub struct HttpSearchBackend {
    http_client: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpSearchBackend {
    pub fn new(config: &SearchServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(InsightError::Http)?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.username {
            Some(ref username) => req.basic_auth(username, self.password.as_ref()),
            None => req,
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(InsightError::Search(format!(
                "Search request failed (HTTP {}): {}",
                status, text
            )));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, index: &str, body: &Value, size: Option<usize>) -> Result<Value> {
        let url = self.search_url(index);
        tracing::debug!("Searching {} at {}", index, url);

        let mut req = self.http_client.post(&url).json(body);
        if let Some(size) = size {
            req = req.query(&[("size", size)]);
        }

        let response = self.authorize(req).send().await?;
        Self::read_json(response).await
    }

    async fn cluster_health(&self) -> Result<ClusterHealth> {
        let url = format!("{}/_cluster/health", self.base_url);
        let response = self.authorize(self.http_client.get(&url)).send().await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_joins_index() {
        let config = SearchServiceConfig {
            url: "https://search.local:9200/".to_string(),
            ..Default::default()
        };
        let backend = HttpSearchBackend::new(&config).unwrap();
        assert_eq!(
            backend.search_url("ei_articles_index"),
            "https://search.local:9200/ei_articles_index/_search"
        );
    }

    #[test]
    fn health_status_availability() {
        let health: ClusterHealth =
            serde_json::from_str(r#"{"status": "yellow", "cluster_name": "c", "number_of_nodes": 1}"#)
                .unwrap();
        assert!(health.is_available());
        assert_eq!(health.cluster_name.as_deref(), Some("c"));

        let red = ClusterHealth { status: "red".into(), cluster_name: None };
        assert!(!red.is_available());
    }
}
