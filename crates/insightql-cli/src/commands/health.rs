//! Health command

use crate::app::OutputFormat;
use crate::output;
use anyhow::{bail, Result};
use insightql_core::{Config, InsightService};

pub async fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let service = InsightService::from_config(config)?;
    let status = service.health_check().await;

    print!("{}", output::format_value(&status, format));

    if status["status"] != "ok" {
        bail!("search cluster is not available");
    }
    Ok(())
}
