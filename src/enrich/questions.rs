//! Question-set completion parser.
//!
//! The question-generation prompt asks for `{"qa_pairs": [...]}` where each
//! pair carries `question`, `answer`, a `type` tag and, for multiple choice,
//! an `options` array. [`parse_question_set`] extracts and validates that
//! payload with the same recovery strategy as the transcript parser.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extract::{extract_value, EnrichError};

// ---------------------------------------------------------------------------
// QuestionKind
// ---------------------------------------------------------------------------

/// The three question formats the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Simple factual recall questions.
    Novice,
    /// Multiple choice, one correct answer among four options.
    Mcq,
    /// A transcript sentence with a key word replaced by `____`.
    FillBlanks,
}

impl QuestionKind {
    /// The wire tag used in prompts, completions and stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Novice => "novice",
            QuestionKind::Mcq => "mcq",
            QuestionKind::FillBlanks => "fill_blanks",
        }
    }

    /// Parse a wire tag; `None` for anything unrecognised.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "novice" => Some(QuestionKind::Novice),
            "mcq" => Some(QuestionKind::Mcq),
            "fill_blanks" => Some(QuestionKind::FillBlanks),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GeneratedQuestion
// ---------------------------------------------------------------------------

/// One question/answer pair as produced by the generator, before it is
/// stored in the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub answer: String,
    pub kind: QuestionKind,
    /// Answer options for multiple choice; empty for other kinds.
    pub options: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a question-generation completion into its QA pairs.
///
/// `requested` is the kind the caller asked the model for; items whose
/// `type` tag is missing or unrecognised fall back to it rather than being
/// rejected, since the tag is advisory while the requested format is not.
pub fn parse_question_set(
    raw: &str,
    requested: QuestionKind,
) -> Result<Vec<GeneratedQuestion>, EnrichError> {
    let value = extract_value(raw)?;

    // The model occasionally returns the bare array instead of the wrapper
    // object; accept both shapes.
    let pairs = match &value {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("qa_pairs")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                EnrichError::SchemaViolation("missing required fields: qa_pairs".into())
            })?,
        _ => {
            return Err(EnrichError::SchemaViolation(
                "completion is not a JSON object".into(),
            ))
        }
    };

    if pairs.is_empty() {
        return Err(EnrichError::SchemaViolation(
            "qa_pairs contains no questions".into(),
        ));
    }

    let mut questions = Vec::with_capacity(pairs.len());
    for pair in pairs {
        questions.push(validate_pair(pair, requested)?);
    }
    Ok(questions)
}

fn validate_pair(pair: &Value, requested: QuestionKind) -> Result<GeneratedQuestion, EnrichError> {
    let pair_error = || EnrichError::SchemaViolation(format!("invalid question item: {pair}"));

    let obj = pair.as_object().ok_or_else(pair_error)?;

    let question = obj
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(pair_error)?;
    let answer = obj
        .get("answer")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(pair_error)?;

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(QuestionKind::parse)
        .unwrap_or(requested);

    let options: Vec<String> = match obj.get("options") {
        None => Vec::new(),
        Some(value) => value
            .as_array()
            .ok_or_else(pair_error)?
            .iter()
            .map(|opt| opt.as_str().map(str::to_string).ok_or_else(pair_error))
            .collect::<Result<_, _>>()?,
    };

    if kind == QuestionKind::Mcq && options.is_empty() {
        return Err(EnrichError::SchemaViolation(format!(
            "multiple-choice question has no options: {pair}"
        )));
    }

    Ok(GeneratedQuestion {
        question: question.to_string(),
        answer: answer.to_string(),
        kind,
        options,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
