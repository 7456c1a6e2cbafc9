//! InsightQL CLI
//!
//! Ask questions of an article index in plain language.

use anyhow::Result;
use clap::Parser;
use insightql_core::error::exit_codes;
use insightql_core::{Config, InsightError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    if let Err(err) = run(cli).await {
        let code = err
            .downcast_ref::<InsightError>()
            .map(InsightError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        eprintln!("Error: {:#}", err);
        std::process::exit(code);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Query(args) => commands::query::run(args, &config, cli.format).await,
        Commands::Search(args) => commands::search::run(args, &config, cli.format).await,
        Commands::Embed(args) => commands::embed::run(args, &config, cli.format).await,
        Commands::Prompt(args) => commands::prompt::run(args, &config, cli.format),
        Commands::Health => commands::health::run(&config, cli.format).await,
    }
}
