//! Prompt command

use super::join_words;
use crate::app::{OutputFormat, QueryArgs};
use anyhow::Result;
use insightql_core::{Config, PromptComposer};

pub fn run(args: QueryArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let prompt = PromptComposer::from_config(config).compose(&join_words(&args.query));

    match format {
        OutputFormat::Cli => println!("{}", prompt),
        OutputFormat::Json => println!("{}", serde_json::json!({ "prompt": prompt })),
    }
    Ok(())
}
