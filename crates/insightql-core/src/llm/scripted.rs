//! Scripted runtime used by unit tests

use super::runtime::{InvokeModelRequest, ModelRuntime};
use crate::error::{InsightError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub model_id: String,
    pub body: Value,
}

/// Replays queued responses in order; an exhausted script fails every call.
pub(crate) struct ScriptedRuntime {
    responses: Mutex<VecDeque<Result<Vec<u8>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRuntime {
    pub fn new(responses: Vec<Result<Vec<u8>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with the same body
    pub fn always(body: &str) -> Self {
        let runtime = Self::new(Vec::new());
        for _ in 0..64 {
            runtime
                .responses
                .lock()
                .unwrap()
                .push_back(Ok(body.as_bytes().to_vec()));
        }
        runtime
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelRuntime for ScriptedRuntime {
    async fn invoke_model(&self, request: InvokeModelRequest<'_>) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(RecordedCall {
            model_id: request.model_id.to_string(),
            body: serde_json::from_str(&request.body).unwrap_or(Value::Null),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(InsightError::ExternalError("script exhausted".into())))
    }
}
