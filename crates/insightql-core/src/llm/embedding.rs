//! Titan embedding adapters
//!
//! Both variants build a payload, hand it to the [`RetryingInvoker`] under a
//! fixed model id and return the vector. `TitanV1` additionally honours a
//! `normalize` flag which is stripped before the payload leaves the process.

use super::normalize::l2_normalize_in_place;
use super::retry::{RetryPolicy, RetryingInvoker};
use super::runtime::ModelRuntime;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const TITAN_V1: &str = "amazon.titan-embed-text-v1";
pub const TITAN_V2: &str = "amazon.titan-embed-text-v2:0";

/// Payload key requesting unit-length output from [`TitanV1`]
pub const NORMALIZE: &str = "normalize";

/// Embedding generation through a remote model
#[async_trait]
pub trait Embedding: Send + Sync {
    /// Generate one embedding. `None` is treated as an empty payload.
    async fn generate_embedding(&self, payload: Option<Map<String, Value>>) -> Result<Vec<f32>>;

    /// Fixed model identifier of this adapter
    fn model_id(&self) -> &str;

    /// Generate several embeddings concurrently. Each payload gets its own
    /// retry loop; the first failure fails the whole batch.
    async fn generate_embeddings(&self, payloads: Vec<Map<String, Value>>) -> Result<Vec<Vec<f32>>> {
        let requests = payloads
            .into_iter()
            .map(|payload| self.generate_embedding(Some(payload)));
        futures::future::try_join_all(requests).await
    }
}

/// Titan v1 adapter with optional client-side normalization
pub struct TitanV1 {
    invoker: RetryingInvoker,
}

impl TitanV1 {
    /// Default policy: 3 attempts, 1 s base delay
    pub fn new(runtime: Arc<dyn ModelRuntime>) -> Self {
        Self::with_policy(runtime, RetryPolicy::default())
    }

    pub fn with_policy(runtime: Arc<dyn ModelRuntime>, policy: RetryPolicy) -> Self {
        Self {
            invoker: RetryingInvoker::new(runtime, policy),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        self.invoker.policy()
    }
}

#[async_trait]
impl Embedding for TitanV1 {
    async fn generate_embedding(&self, payload: Option<Map<String, Value>>) -> Result<Vec<f32>> {
        let mut payload = payload.unwrap_or_default();
        // Only a JSON `true` turns normalization on
        let normalize = matches!(payload.remove(NORMALIZE), Some(Value::Bool(true)));

        let mut vector = self.invoker.invoke_with_retry(TITAN_V1, &payload).await?;
        if normalize {
            l2_normalize_in_place(&mut vector);
        }
        Ok(vector)
    }

    fn model_id(&self) -> &str {
        TITAN_V1
    }
}

/// Titan v2 adapter, payload forwarded as-is
pub struct TitanV2 {
    invoker: RetryingInvoker,
}

impl TitanV2 {
    /// Default policy: 3 attempts, 1 s base delay
    pub fn new(runtime: Arc<dyn ModelRuntime>) -> Self {
        Self::with_policy(runtime, RetryPolicy::default())
    }

    pub fn with_policy(runtime: Arc<dyn ModelRuntime>, policy: RetryPolicy) -> Self {
        Self {
            invoker: RetryingInvoker::new(runtime, policy),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        self.invoker.policy()
    }
}

#[async_trait]
impl Embedding for TitanV2 {
    async fn generate_embedding(&self, payload: Option<Map<String, Value>>) -> Result<Vec<f32>> {
        let payload = payload.unwrap_or_default();
        self.invoker.invoke_with_retry(TITAN_V2, &payload).await
    }

    fn model_id(&self) -> &str {
        TITAN_V2
    }
}
