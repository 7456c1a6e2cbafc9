//! Retrying model invocation with exponential backoff and jitter.
//!
//! Every failure inside one attempt (serializing the payload, the remote call,
//! decoding the body, pulling the result field out) is an `Err` from
//! [`RetryingInvoker::attempt`] and costs one attempt. After `max_attempts`
//! failures the call ends with [`InsightError::ModelInvocationExhausted`].
//!
//! Sleeps go through `tokio::time::sleep`, so dropping the returned future
//! abandons the loop at the next backoff.

use super::runtime::{InvokeModelRequest, ModelRuntime};
use crate::error::{InsightError, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Result field holding the vector in embedding responses
pub const EMBEDDING: &str = "embedding";

/// Bounded exponential backoff with additive jitter.
///
/// The delay before attempt `n` (n >= 2) is
/// `base_delay * 2^(n-2) + uniform(0, jitter_upper_bound)`.
/// Unless set explicitly, the jitter bound follows `base_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    jitter_upper_bound: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Jitter bound defaults to `base_delay`. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            jitter_upper_bound: None,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_jitter_upper_bound(mut self, bound: Duration) -> Self {
        self.jitter_upper_bound = Some(bound);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn jitter_upper_bound(&self) -> Duration {
        self.jitter_upper_bound.unwrap_or(self.base_delay)
    }

    /// Delay after `failed_attempts` failures (1-based) for a given jitter sample.
    pub fn backoff(&self, failed_attempts: u32, jitter: Duration) -> Duration {
        let exponent = failed_attempts.saturating_sub(1);
        let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).saturating_add(jitter)
    }

    /// Delay after `failed_attempts` failures with a freshly sampled jitter.
    pub fn next_delay(&self, failed_attempts: u32) -> Duration {
        self.backoff(failed_attempts, self.sample_jitter())
    }

    fn sample_jitter(&self) -> Duration {
        let bound = self.jitter_upper_bound();
        if bound.is_zero() {
            Duration::ZERO
        } else {
            bound.mul_f64(fastrand::f64())
        }
    }
}

/// Wraps a [`ModelRuntime`] with bounded retries
#[derive(Clone)]
pub struct RetryingInvoker {
    runtime: Arc<dyn ModelRuntime>,
    policy: RetryPolicy,
}

impl RetryingInvoker {
    pub fn new(runtime: Arc<dyn ModelRuntime>, policy: RetryPolicy) -> Self {
        Self { runtime, policy }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Invoke an embedding model and return the `embedding` vector.
    pub async fn invoke_with_retry(
        &self,
        model_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Vec<f32>> {
        self.invoke_with_retry_map(model_id, payload, extract_embedding)
            .await
    }

    /// Invoke a model and turn the decoded JSON body into `T` with `extract`.
    ///
    /// An `Err` from `extract` is a failed attempt like any transport error.
    pub async fn invoke_with_retry_map<T, F>(
        &self,
        model_id: &str,
        payload: &Map<String, Value>,
        extract: F,
    ) -> Result<T>
    where
        F: Fn(Value) -> Result<T> + Send + Sync,
        T: Send,
    {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        while attempt < max_attempts {
            match self.attempt(model_id, payload, &extract).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    tracing::warn!(model_id, "Attempt {} failed: {}", attempt, e);

                    if attempt < max_attempts {
                        let delay = self.policy.next_delay(attempt);
                        tracing::debug!(model_id, "Retrying in {:?}", delay);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(InsightError::ModelInvocationExhausted {
            model_id: model_id.to_string(),
            attempts: max_attempts,
        })
    }

    async fn attempt<T, F>(
        &self,
        model_id: &str,
        payload: &Map<String, Value>,
        extract: &F,
    ) -> Result<T>
    where
        F: Fn(Value) -> Result<T> + Send + Sync,
    {
        let body = serde_json::to_string(payload)?;
        let raw = self
            .runtime
            .invoke_model(InvokeModelRequest::json(model_id, body))
            .await?;
        let decoded: Value = serde_json::from_slice(&raw)?;
        extract(decoded)
    }
}

/// Pull the `embedding` array out of a decoded response body
pub fn extract_embedding(body: Value) -> Result<Vec<f32>> {
    match body {
        Value::Object(mut map) => {
            let vector = map
                .remove(EMBEDDING)
                .ok_or_else(|| InsightError::MissingField(EMBEDDING.to_string()))?;
            Ok(serde_json::from_value(vector)?)
        }
        _ => Err(InsightError::MissingField(EMBEDDING.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedRuntime;
    use serde_json::json;

    fn payload() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("inputText".into(), json!("test"));
        map
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay(), Duration::from_secs(1));
        assert_eq!(policy.jitter_upper_bound(), Duration::from_secs(1));
    }

    #[test]
    fn zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts(), 1);
    }

    #[test]
    fn backoff_doubles_per_failure() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        let jitter = Duration::from_millis(500);
        assert_eq!(policy.backoff(1, jitter), Duration::from_millis(1500));
        assert_eq!(policy.backoff(2, jitter), Duration::from_millis(2500));
        assert_eq!(policy.backoff(3, Duration::ZERO), Duration::from_secs(4));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert!(policy.backoff(80, Duration::ZERO) >= Duration::from_secs(u32::MAX as u64));
    }

    #[test]
    fn sampled_delay_within_jitter_bound() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        for _ in 0..100 {
            let delay = policy.next_delay(1);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(200));
        }
    }

    #[test]
    fn jitter_bound_follows_base_delay() {
        let policy = RetryPolicy::default().with_base_delay(Duration::from_millis(10));
        assert_eq!(policy.jitter_upper_bound(), Duration::from_millis(10));
        for _ in 0..200 {
            let delay = policy.next_delay(1);
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(20), "delay {delay:?}");
        }
    }

    #[test]
    fn explicit_jitter_bound_survives_base_change() {
        let policy = RetryPolicy::default()
            .with_jitter_upper_bound(Duration::from_millis(3))
            .with_base_delay(Duration::from_millis(50));
        assert_eq!(policy.jitter_upper_bound(), Duration::from_millis(3));
    }

    #[test]
    fn zero_jitter_bound_is_deterministic() {
        let policy =
            RetryPolicy::new(3, Duration::from_millis(100)).with_jitter_upper_bound(Duration::ZERO);
        assert_eq!(policy.next_delay(2), Duration::from_millis(200));
    }

    #[test]
    fn extract_embedding_requires_field() {
        let err = extract_embedding(json!({"error": "no embedding"})).unwrap_err();
        assert!(matches!(err, InsightError::MissingField(_)));
        assert!(extract_embedding(json!([1, 2])).is_err());
        assert_eq!(
            extract_embedding(json!({"embedding": [1, 2, 3]})).unwrap(),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn bad_json_body_consumes_attempt() {
        let runtime = Arc::new(ScriptedRuntime::new(vec![Ok(b"invalid json".to_vec())]));
        let invoker = RetryingInvoker::new(runtime.clone(), RetryPolicy::new(1, Duration::ZERO));

        let err = invoker
            .invoke_with_retry("test-model", &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::ModelInvocationExhausted { attempts: 1, .. }));
        assert_eq!(runtime.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_field_then_success() {
        let runtime = Arc::new(ScriptedRuntime::new(vec![
            Ok(br#"{"error": "no embedding"}"#.to_vec()),
            Ok(br#"{"embedding": [0.5, 0.25]}"#.to_vec()),
        ]));
        let invoker = RetryingInvoker::new(runtime.clone(), RetryPolicy::new(2, Duration::ZERO));

        let vector = invoker
            .invoke_with_retry("test-model", &payload())
            .await
            .unwrap();
        assert_eq!(vector, vec![0.5, 0.25]);
        assert_eq!(runtime.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn forwards_serialized_payload_and_model_id() {
        let runtime = Arc::new(ScriptedRuntime::new(vec![Ok(
            br#"{"embedding": [1.0]}"#.to_vec()
        )]));
        let invoker = RetryingInvoker::new(runtime.clone(), RetryPolicy::default());

        invoker
            .invoke_with_retry("amazon.titan-embed-text-v1", &payload())
            .await
            .unwrap();

        let calls = runtime.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model_id, "amazon.titan-embed-text-v1");
        assert_eq!(calls[0].body, json!({"inputText": "test"}));
    }
}
