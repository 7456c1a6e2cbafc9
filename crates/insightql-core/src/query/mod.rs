//! Query generation
//!
//! A user question becomes a prompt, the text model answers, the answer is
//! mined for JSON and the result is validated into an OpenSearch query body.

mod generator;
mod prompt;
mod response_parser;
mod validator;

pub use generator::QueryGenerator;
pub use prompt::{PromptComposer, Vocabulary, EMBEDDING_MODEL_PLACEHOLDER};
pub use response_parser::extract_json;
pub use validator::{
    classify, default_query, is_valid_query, validate_or_default, QueryKind, KNN_KEY, QUERY_KEY,
};
