//! Configuration management

use crate::error::{InsightError, Result};
use crate::llm::RetryPolicy;
use crate::query::Vocabulary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote inference service configuration
    #[serde(default)]
    pub model_service: ModelServiceConfig,

    /// Search engine configuration
    #[serde(default)]
    pub search: SearchServiceConfig,

    /// Vocabulary injected into the query-generation prompt
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

/// Remote inference service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelServiceConfig {
    /// Base URL of the model runtime (`{url}/model/{model_id}/invoke`)
    pub url: String,

    /// Model used to translate natural language into query DSL
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Embedding model referenced by generated vector queries
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API key (optional, sent as a bearer token)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Completion budget for query generation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: f32,

    /// Attempts per model call, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl ModelServiceConfig {
    /// Retry policy for calls made against this service
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl Default for ModelServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("INSIGHTQL_MODEL_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            llm_model: default_llm_model(),
            embedding_model: default_embedding_model(),
            api_key: std::env::var("INSIGHTQL_API_KEY").ok(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    /// Base URL of the search engine
    pub url: String,

    /// Index queried by `search_insights`
    #[serde(default = "default_index")]
    pub index: String,

    /// Number of hits requested per search. Hits are chunks, so this is
    /// well above the number of documents expected after deduplication.
    #[serde(default = "default_size")]
    pub size: usize,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("INSIGHTQL_SEARCH_URL")
                .unwrap_or_else(|_| "http://localhost:9200".to_string()),
            index: default_index(),
            size: default_size(),
            username: std::env::var("INSIGHTQL_SEARCH_USERNAME").ok(),
            password: std::env::var("INSIGHTQL_SEARCH_PASSWORD").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_llm_model() -> String {
    std::env::var("INSIGHTQL_LLM_MODEL")
        .unwrap_or_else(|_| "anthropic.claude-3-haiku-20240307-v1:0".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("INSIGHTQL_EMBEDDING_MODEL")
        .unwrap_or_else(|_| crate::llm::TITAN_V2.to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_max_attempts() -> u32 {
    env_number("INSIGHTQL_MAX_ATTEMPTS").unwrap_or(3)
}

fn default_base_delay_ms() -> u64 {
    env_number("INSIGHTQL_RETRY_BASE_DELAY_MS").unwrap_or(1000)
}

fn default_index() -> String {
    std::env::var("INSIGHTQL_SEARCH_INDEX").unwrap_or_else(|_| "ei_articles_index".to_string())
}

fn default_size() -> usize {
    env_number("INSIGHTQL_SEARCH_SIZE").unwrap_or(1000)
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Config {
    /// Load config from `$INSIGHTQL_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("INSIGHTQL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self::load_from(&path)
    }

    /// Load config from an explicit path, falling back to defaults when absent
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    fn validate(&self) -> Result<()> {
        if self.model_service.max_attempts == 0 {
            return Err(InsightError::Config(
                "model_service.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.search.index.trim().is_empty() {
            return Err(InsightError::Config("search.index must not be empty".to_string()));
        }
        Ok(())
    }
}
