//! Query command

use super::join_words;
use crate::app::{OutputFormat, QueryArgs};
use crate::output;
use anyhow::Result;
use insightql_core::{error_payload, Config, InsightService, QueryRequest};

pub async fn run(args: QueryArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let service = InsightService::from_config(config)?;
    let request = QueryRequest::new(join_words(&args.query));

    match service.search_query(&request).await {
        Ok(query) => {
            print!("{}", output::format_value(&query, format));
            Ok(())
        }
        Err(e) => {
            print!("{}", output::format_value(&error_payload(&e), format));
            Err(e.into())
        }
    }
}
