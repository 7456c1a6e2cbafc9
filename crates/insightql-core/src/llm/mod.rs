//! Model invocation
//!
//! Provides:
//! - A transport seam for remote inference (`ModelRuntime`)
//! - Bounded retries with exponential backoff and jitter
//! - Titan embedding adapters
//! - Text completion for query generation

mod embedding;
mod normalize;
mod retry;
mod runtime;
mod text_model;

#[cfg(test)]
pub(crate) mod scripted;

pub use embedding::{Embedding, TitanV1, TitanV2, NORMALIZE, TITAN_V1, TITAN_V2};
pub use retry::{extract_embedding, RetryPolicy, RetryingInvoker, EMBEDDING};
pub use runtime::{HttpModelRuntime, InvokeModelRequest, ModelRuntime, APPLICATION_JSON};
pub use text_model::{BedrockTextModel, TextModel};
