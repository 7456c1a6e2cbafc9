//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "insightql")]
#[command(
    author,
    version,
    about = "Natural-language search over an OpenSearch article index"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $INSIGHTQL_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a query body for a question
    Query(QueryArgs),

    /// Generate a query, run it and print deduplicated results
    Search(SearchArgs),

    /// Generate an embedding with a Titan model
    Embed(EmbedArgs),

    /// Print the query-generation prompt without calling any model
    Prompt(QueryArgs),

    /// Check search cluster health
    Health,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Natural language question
    #[arg(required = true)]
    pub query: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Natural language question
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Number of hits to request
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Index to search
    #[arg(long)]
    pub index: Option<String>,

    /// `_source` fields to project from each hit
    #[arg(long, value_delimiter = ',', requires = "rename")]
    pub fields: Vec<String>,

    /// Output names for the projected fields
    #[arg(long, value_delimiter = ',', requires = "fields")]
    pub rename: Vec<String>,
}

#[derive(Args)]
pub struct EmbedArgs {
    /// Text to embed
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Titan model variant
    #[arg(long, value_enum, default_value = "v2")]
    pub variant: TitanVariant,

    /// Ask for a unit-length vector
    #[arg(long)]
    pub normalize: bool,

    /// Output dimensions (v2 only)
    #[arg(long)]
    pub dimensions: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TitanVariant {
    V1,
    V2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
