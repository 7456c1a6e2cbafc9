//! Embed command

use super::join_words;
use crate::app::{EmbedArgs, OutputFormat, TitanVariant};
use crate::output;
use anyhow::Result;
use insightql_core::llm::NORMALIZE;
use insightql_core::{Config, Embedding, HttpModelRuntime, ModelRuntime, TitanV1, TitanV2};
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub async fn run(args: EmbedArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let runtime: Arc<dyn ModelRuntime> = Arc::new(HttpModelRuntime::new(&config.model_service)?);
    let policy = config.model_service.retry_policy();

    let embedder: Box<dyn Embedding> = match args.variant {
        TitanVariant::V1 => Box::new(TitanV1::with_policy(runtime, policy)),
        TitanVariant::V2 => Box::new(TitanV2::with_policy(runtime, policy)),
    };

    let mut payload = Map::new();
    payload.insert("inputText".to_string(), json!(join_words(&args.text)));
    if args.normalize {
        payload.insert(NORMALIZE.to_string(), Value::Bool(true));
    }
    if let Some(dimensions) = args.dimensions {
        payload.insert("dimensions".to_string(), json!(dimensions));
    }

    let vector = embedder.generate_embedding(Some(payload)).await?;
    print!(
        "{}",
        output::format_embedding(embedder.model_id(), &vector, format)
    );
    Ok(())
}
