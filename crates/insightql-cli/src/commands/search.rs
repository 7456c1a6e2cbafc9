//! Search command

use super::join_words;
use crate::app::{OutputFormat, SearchArgs};
use crate::output;
use anyhow::Result;
use insightql_core::{error_payload, map_hits, Config, InsightService, QueryRequest};

pub async fn run(args: SearchArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let mut service = InsightService::from_config(config)?;
    if let Some(index) = args.index {
        service = service.with_index(index);
    }
    if let Some(size) = args.size {
        service = service.with_size(size);
    }

    let request = QueryRequest::new(join_words(&args.query));
    let response = match service.search_insights(&request).await {
        Ok(response) => response,
        Err(e) => {
            print!("{}", output::format_value(&error_payload(&e), format));
            return Err(e.into());
        }
    };

    if args.fields.is_empty() {
        print!("{}", output::format_insights(&response, format));
        return Ok(());
    }

    let hits = response.results.get("hits").and_then(|h| h.get("hits"));
    match map_hits(hits, &args.fields, &args.rename) {
        Ok(records) => {
            print!("{}", output::format_records(&records, format));
            Ok(())
        }
        Err(e) => {
            print!("{}", output::format_value(&error_payload(&e), format));
            Err(e.into())
        }
    }
}
