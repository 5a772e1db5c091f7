//! JSON recovery from free-form LLM output.
//!
//! Models asked for "JSON only" still wrap it in prose, put it in a markdown
//! fence, or emit an object where an array was requested. [`extract_json`]
//! runs an ordered chain of strategies, strictest first, and returns the
//! first candidate that parses to an object or to an array holding at least
//! one object.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Extraction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Model returned no content")]
    EmptyResponse,

    #[error("No JSON object or array found in model response ({} bytes)", .raw.len())]
    NoJson { raw: String },
}

impl ExtractionError {
    /// The raw model text, when there was any.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            ExtractionError::EmptyResponse => None,
            ExtractionError::NoJson { raw } => Some(raw),
        }
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// One step of the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The whole (trimmed) text is JSON.
    Direct,
    /// First markdown code fence, optionally tagged `json`.
    Fenced,
    /// First balanced `[ ... ]` span.
    BalancedArray,
    /// First balanced `{ ... }` span.
    BalancedObject,
}

impl Strategy {
    /// Chain order. Later strategies are more permissive and more likely to
    /// pick up a false positive, so they only run when earlier ones fail.
    pub const CHAIN: [Strategy; 4] = [
        Strategy::Direct,
        Strategy::Fenced,
        Strategy::BalancedArray,
        Strategy::BalancedObject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::Fenced => "fenced",
            Strategy::BalancedArray => "balanced_array",
            Strategy::BalancedObject => "balanced_object",
        }
    }

    /// Run this strategy alone. Parse failures yield `None`.
    pub fn attempt(self, text: &str) -> Option<Value> {
        match self {
            Strategy::Direct => try_parse(text),
            Strategy::Fenced => fenced_block(text).and_then(try_parse),
            Strategy::BalancedArray => find_balanced(text, b'[', b']').and_then(try_parse),
            Strategy::BalancedObject => find_balanced(text, b'{', b'}').and_then(try_parse),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate recovered from model text.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub value: Value,
    pub strategy: Strategy,
}

/// Recover a JSON object or array of objects from raw model text.
///
/// Absent, empty and whitespace-only text fails with
/// [`ExtractionError::EmptyResponse`] before any strategy runs.
pub fn extract_json(raw: Option<&str>) -> ExtractionResult<Extracted> {
    let text = match raw {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ExtractionError::EmptyResponse),
    };

    Strategy::CHAIN
        .iter()
        .find_map(|&strategy| {
            strategy
                .attempt(text)
                .map(|value| Extracted { value, strategy })
        })
        .ok_or_else(|| ExtractionError::NoJson {
            raw: text.to_string(),
        })
}

/// Parse trimmed text, accepting only objects and arrays that hold an object.
fn try_parse(text: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    is_candidate(&value).then_some(value)
}

fn is_candidate(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("fence pattern is valid")
});

/// Interior of the first markdown code fence, trimmed.
pub fn fenced_block(text: &str) -> Option<&str> {
    FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Find the span from the first `open` byte to its matching `close`.
///
/// Brackets inside string literals do not count. Both `"` and `'` open a
/// string, which only closes on the same quote; inside a string the byte
/// after a backslash is skipped. Returns `None` if the span never closes.
pub fn find_balanced(text: &str, open: u8, close: u8) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|&b| b == open)?;

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
            }
            None => {
                if b == b'"' || b == b'\'' {
                    quote = Some(b);
                } else if b == open {
                    depth += 1;
                } else if b == close {
                    depth -= 1;
                    if depth == 0 {
                        // Both ends are ASCII, so these are char boundaries.
                        return Some(&text[start..=i]);
                    }
                }
            }
        }
        i += 1;
    }

    None
}
