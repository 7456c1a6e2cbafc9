//! Command implementations

pub mod embed;
pub mod health;
pub mod prompt;
pub mod query;
pub mod search;

/// Rejoin the words of a positional text argument
pub(crate) fn join_words(words: &[String]) -> String {
    words.join(" ")
}
