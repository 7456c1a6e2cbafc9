//! Error types for insightql

use thiserror::Error;

/// Result type alias using InsightError
pub type Result<T> = std::result::Result<T, InsightError>;

/// Error type alias for convenience
pub type Error = InsightError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
    pub const UNAVAILABLE: i32 = 4;
}

/// Main error type for insightql
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to invoke model {model_id} after {attempts} attempts")]
    ModelInvocationExhausted { model_id: String, attempts: u32 },

    #[error("Response is missing field `{0}`")]
    MissingField(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External service error: {0}")]
    ExternalError(String),
}

impl InsightError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) | Self::Config(_) | Self::InvalidData(_) => {
                exit_codes::INVALID_INPUT
            }
            Self::ModelInvocationExhausted { .. } | Self::ExternalError(_) | Self::Http(_) => {
                exit_codes::UNAVAILABLE
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
