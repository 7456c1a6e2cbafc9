//! Best-effort JSON extraction from free-form model output

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

lazy_static! {
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap();
}

/// Extract a JSON document from model output.
///
/// Tries, in order: the contents of the first fenced code block (if any),
/// a direct parse, then the first balanced `{...}` span. Never fails;
/// returns an empty object when nothing parses.
pub fn extract_json(raw: &str) -> Value {
    let mut text = raw.trim();

    if text.contains("```") {
        if let Some(inner) = FENCED_BLOCK.captures(text).and_then(|c| c.get(1)) {
            text = inner.as_str().trim();
        }
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => return value,
        Err(e) => warn!("Direct JSON parse failed: {}", e),
    }

    balanced_object(text).unwrap_or_else(|| {
        error!("All JSON extraction attempts failed, returning empty object");
        Value::Object(Map::new())
    })
}

fn balanced_object(text: &str) -> Option<Value> {
    let Some(start) = text.find('{') else {
        error!("No opening brace found in: {}", snippet(text, 100));
        return None;
    };

    let Some(end) = matching_brace(text, start) else {
        error!(
            "No matching closing brace. Attempted to parse: {}...",
            snippet(&text[start..], 200)
        );
        return None;
    };

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value) => {
            info!("Successfully extracted JSON from text");
            Some(value)
        }
        Err(e) => {
            error!("Failed to extract valid JSON: {}", e);
            error!("Attempted to parse: {}...", snippet(&text[start..], 200));
            None
        }
    }
}

/// Byte offset of the brace closing the one at `start`.
///
/// Braces inside string literals don't count. A backslash escapes the next
/// character wherever it appears.
fn matching_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// First `max_chars` characters of `text`
pub(crate) fn snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
