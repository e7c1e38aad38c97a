//! Extraction of a single JSON object from a noisy completion.
//!
//! # Recovery strategy
//!
//! Ordered attempts, cheapest first, stop at the first success:
//!
//! 1. Strip a markdown fence (```` ```json ```` / ```` ``` ````) and parse
//!    the remainder directly.
//! 2. When the `{` and `}` counts differ (the completion was cut off
//!    upstream), scan from the first `{` tracking nesting depth and slice
//!    the first complete object. No complete object means the payload is
//!    unrecoverable: [`EnrichError::TruncatedCompletion`].
//! 3. Slice from the first `{` to the last `}` to shed surrounding prose,
//!    then parse.
//! 4. Collapse every whitespace run to a single space and parse once more
//!    (bare newlines inside string values are the usual culprit).
//!
//! The caller validates the parsed value against its schema afterwards;
//! extraction only promises "one syntactically complete JSON value".

use serde_json::Value;
use thiserror::Error;

/// How many characters of the raw completion are kept in error previews.
const PREVIEW_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// EnrichError
// ---------------------------------------------------------------------------

/// All errors that can arise from completion parsing and validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnrichError {
    /// No extraction strategy produced parseable JSON. Carries the syntax
    /// error from the last parse attempt and a capped preview of the raw
    /// completion for logging.
    #[error("could not parse completion as JSON: {detail} (completion starts: {preview:?})")]
    MalformedCompletion { detail: String, preview: String },

    /// Brace imbalance with no recoverable complete object, the upstream
    /// length limit cut the completion off.
    #[error("completion is truncated: no complete JSON object found")]
    TruncatedCompletion,

    /// Parsed fine, but the object does not satisfy the expected schema.
    /// The message names the offending field or quotes the offending item.
    #[error("completion violates the expected schema: {0}")]
    SchemaViolation(String),
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Pull one JSON value out of `raw`, tolerating prose, fences and truncated
/// tails as described in the module docs.
pub(crate) fn extract_value(raw: &str) -> Result<Value, EnrichError> {
    let trimmed = raw.trim();

    // Attempt 1: fence strip + direct parse.
    let unfenced = strip_fences(trimmed);
    if let Ok(value) = serde_json::from_str::<Value>(unfenced) {
        return Ok(value);
    }

    // Attempt 2: brace-balance recovery when the completion looks cut off.
    let opens = trimmed.matches('{').count();
    let closes = trimmed.matches('}').count();
    let text = if opens != closes {
        log::warn!("completion has unmatched braces ({opens} open, {closes} close)");
        balanced_span(trimmed)?
    } else {
        trimmed
    };

    // Attempt 3: slice from the first '{' to the last '}' to shed prose.
    let cleaned = strip_fences(text);
    let candidate = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end >= start => &cleaned[start..=end],
        _ => {
            return Err(EnrichError::MalformedCompletion {
                detail: "no JSON object found in completion".into(),
                preview: preview(raw),
            })
        }
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            // Attempt 4: collapse whitespace runs and retry once.
            let collapsed: String = candidate.split_whitespace().collect::<Vec<_>>().join(" ");
            serde_json::from_str::<Value>(&collapsed).map_err(|_| {
                EnrichError::MalformedCompletion {
                    detail: first_err.to_string(),
                    preview: preview(raw),
                }
            })
        }
    }
}

/// Slice the first complete `{...}` object out of `text`.
///
/// Scans from the first `{`, tracking nesting depth; the first return to
/// depth zero closes the object. Only called when the brace counts are
/// unequal, which signals an upstream truncation.
fn balanced_span(text: &str) -> Result<&str, EnrichError> {
    let start = match text.find('{') {
        Some(idx) => idx,
        None => {
            return Err(EnrichError::MalformedCompletion {
                detail: "no JSON object found in completion".into(),
                preview: preview(text),
            })
        }
    };

    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(EnrichError::TruncatedCompletion)
}

/// Strip a leading markdown fence opener and a trailing fence closer.
///
/// The markers are matched literally (` ```json ` then ` ``` `), the way the
/// model actually emits them.
fn strip_fences(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```json") {
        t = rest.trim_start();
    } else if let Some(rest) = t.strip_prefix("```") {
        t = rest.trim_start();
    }
    if let Some(rest) = t.strip_suffix("```") {
        t = rest.trim_end();
    }
    t
}

/// First [`PREVIEW_CHARS`] characters of the raw completion, for error
/// context without dumping a whole transcript into the logs.
fn preview(raw: &str) -> String {
    raw.chars().take(PREVIEW_CHARS).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
