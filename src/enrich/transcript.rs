//! Enriched-transcript record and its completion parser.
//!
//! [`parse_enriched_transcript`] turns a raw completion into an
//! [`EnrichedTranscript`] or a typed [`EnrichError`]. Validation runs on the
//! extracted JSON value before any field is accepted:
//!
//! * `punctuated_text`, `translation`, `vocabulary` must all be present;
//!   a failure names every missing field.
//! * `punctuated_text` and `translation` must be non-empty after trimming.
//! * `vocabulary` must be an array; each item needs `word`, `meaning` and an
//!   `example` carrying both `hindi` and `english` keys. Example sentences
//!   may be empty, missing keys may not.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::extract::{extract_value, EnrichError};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One example sentence in both languages.
///
/// The field names are part of the response contract with the model, which
/// is prompted for `hindi`/`english` keys specifically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilingualExample {
    pub hindi: String,
    pub english: String,
}

/// One vocabulary entry extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub word: String,
    pub meaning: String,
    pub example: BilingualExample,
}

/// A processed transcript: punctuation restored, translated, with the most
/// important vocabulary pulled out.
///
/// Order of `vocabulary` is preserved for display; it carries no semantic
/// weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTranscript {
    pub punctuated_text: String,
    pub translation: String,
    pub vocabulary: Vec<VocabularyItem>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

const REQUIRED_FIELDS: [&str; 3] = ["punctuated_text", "translation", "vocabulary"];

/// Parse a raw completion into an [`EnrichedTranscript`].
///
/// Pure function of the input string; see the module docs of
/// [`crate::enrich`] for the recovery strategy and failure semantics.
pub fn parse_enriched_transcript(raw: &str) -> Result<EnrichedTranscript, EnrichError> {
    let value = extract_value(raw)?;
    validate(&value)
}

fn validate(value: &Value) -> Result<EnrichedTranscript, EnrichError> {
    let obj = value.as_object().ok_or_else(|| {
        EnrichError::SchemaViolation("completion is not a JSON object".into())
    })?;

    let missing: Vec<&str> = REQUIRED_FIELDS
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

    let punctuated_text = required_text(obj, "punctuated_text")?;
    let translation = required_text(obj, "translation")?;

    let items = obj
        .get("vocabulary")
        .and_then(Value::as_array)
        .ok_or_else(|| EnrichError::SchemaViolation("vocabulary must be an array".into()))?;

    let mut vocabulary = Vec::with_capacity(items.len());
    for item in items {
        vocabulary.push(validate_vocabulary_item(item)?);
    }

    Ok(EnrichedTranscript {
        punctuated_text,
        translation,
        vocabulary,
    })
}

/// A required top-level field that must be a non-empty string after trimming.
fn required_text(obj: &Map<String, Value>, field: &'static str) -> Result<String, EnrichError> {
    let text = obj
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| EnrichError::SchemaViolation(format!("{field} must be a string")))?;

    if text.trim().is_empty() {
        return Err(EnrichError::SchemaViolation(format!("{field} is empty")));
    }
    Ok(text.to_string())
}

fn validate_vocabulary_item(item: &Value) -> Result<VocabularyItem, EnrichError> {
    let item_error =
        || EnrichError::SchemaViolation(format!("invalid vocabulary item structure: {item}"));

    let obj = item.as_object().ok_or_else(item_error)?;
    if !obj.contains_key("word") || !obj.contains_key("meaning") || !obj.contains_key("example") {
        return Err(item_error());
    }

    let word = obj.get("word").and_then(Value::as_str).ok_or_else(item_error)?;
    let meaning = obj
        .get("meaning")
        .and_then(Value::as_str)
        .ok_or_else(item_error)?;

    let example_error = || {
        EnrichError::SchemaViolation(format!(
            "invalid example structure in vocabulary item: {item}"
        ))
    };
    let example = obj
        .get("example")
        .and_then(Value::as_object)
        .ok_or_else(example_error)?;
    if !example.contains_key("hindi") || !example.contains_key("english") {
        return Err(example_error());
    }

    // Both keys must exist and hold strings; emptiness is tolerated since a
    // short word sometimes comes back with a bare example.
    let hindi = example
        .get("hindi")
        .and_then(Value::as_str)
        .ok_or_else(example_error)?;
    let english = example
        .get("english")
        .and_then(Value::as_str)
        .ok_or_else(example_error)?;

    Ok(VocabularyItem {
        word: word.to_string(),
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
