//! Word-meaning completion parser.
//!
//! The word-query prompt asks for `{"meaning": ..., "example": {"hindi":
//! ..., "english": ...}}`. [`parse_word_meaning`] extracts and validates
//! that payload; the result is what the shared dictionary stores per word.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extract::{extract_value, EnrichError};
use super::transcript::BilingualExample;

// ---------------------------------------------------------------------------
// WordMeaning
// ---------------------------------------------------------------------------

/// A beginner-level explanation of one word: short English meaning plus one
/// bilingual example sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMeaning {
    pub meaning: String,
    pub example: BilingualExample,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a word-meaning completion into a [`WordMeaning`].
pub fn parse_word_meaning(raw: &str) -> Result<WordMeaning, EnrichError> {
    let value = extract_value(raw)?;

    let obj = value.as_object().ok_or_else(|| {
        EnrichError::SchemaViolation("completion is not a JSON object".into())
    })?;

    let missing: Vec<&str> = ["meaning", "example"]
        .iter()
        .copied()
        .filter(|field| !obj.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(EnrichError::SchemaViolation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let meaning = obj
        .get("meaning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| EnrichError::SchemaViolation("meaning is empty".into()))?;

    let example_error =
        || EnrichError::SchemaViolation(format!("invalid example structure: {value}"));
    let example = obj
        .get("example")
        .and_then(Value::as_object)
        .ok_or_else(example_error)?;

    let hindi = example
        .get("hindi")
        .and_then(Value::as_str)
        .ok_or_else(example_error)?;
    let english = example
        .get("english")
        .and_then(Value::as_str)
        .ok_or_else(example_error)?;

    Ok(WordMeaning {
        meaning: meaning.to_string(),
        example: BilingualExample {
            hindi: hindi.to_string(),
            english: english.to_string(),
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
