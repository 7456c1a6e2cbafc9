//! InsightQL Core Library
//!
//! Natural language search over an article index.
//!
//! # Features
//! - LLM-generated OpenSearch query bodies with a match-all fallback
//! - Tolerant JSON extraction from model output
//! - Retrying model invocation with exponential backoff and jitter
//! - Titan embedding adapters with optional client-side normalization
//! - Per-document deduplication of chunk hits

pub mod config;
pub mod error;
pub mod llm;
pub mod query;
pub mod search;
pub mod service;

pub use config::{Config, ModelServiceConfig, SearchServiceConfig};
pub use error::{Error, InsightError, Result};
pub use llm::{
    BedrockTextModel, Embedding, HttpModelRuntime, InvokeModelRequest, ModelRuntime, RetryPolicy,
    RetryingInvoker, TextModel, TitanV1, TitanV2,
};
pub use query::{
    default_query, extract_json, validate_or_default, PromptComposer, QueryGenerator, Vocabulary,
};
pub use search::{
    get_unique_docs, map_hits, ClusterHealth, HttpSearchBackend, SearchBackend,
    SearchResultEnvelope,
};
pub use service::{error_payload, InsightService, InsightsResponse, QueryRequest};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "insightql";
