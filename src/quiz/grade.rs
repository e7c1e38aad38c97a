//! Answer grading.
//!
//! Grading is deliberately forgiving about presentation and strict about
//! content: surrounding whitespace and letter case never count against the
//! learner, anything else does. The comparison itself is pure; counter
//! updates live in [`crate::quiz::bank`].

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// GradeError
// ---------------------------------------------------------------------------

/// Errors in the grading path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    /// The submission was empty after trimming. Rejected before any counter
    /// is touched.
    #[error("answer cannot be empty")]
    EmptySubmission,
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

/// Feedback line for a correct submission.
pub const FEEDBACK_CORRECT: &str = "Correct!";
/// Feedback line for an incorrect submission.
pub const FEEDBACK_INCORRECT: &str = "Incorrect. Try again!";

/// Compare a submitted answer against the canonical one.
///
/// Both sides are trimmed and lowercased before the exact-equality check.
/// Lowercasing is the identity for Devanagari; it matters for Latin-script
/// answers (loanwords, numbers spelled out in English).
pub fn grade(submitted: &str, canonical: &str) -> Result<bool, GradeError> {
    let submitted = submitted.trim();
    if submitted.is_empty() {
        return Err(GradeError::EmptySubmission);
    }

    Ok(submitted.to_lowercase() == canonical.trim().to_lowercase())
}

// ---------------------------------------------------------------------------
// GradeOutcome
// ---------------------------------------------------------------------------

/// The result handed back to the learner after a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
    pub is_correct: bool,
    /// The canonical answer, withheld when the submission was already
    /// correct (no need to echo what the learner just typed).
    pub correct_answer: Option<String>,
    pub feedback: &'static str,
    /// Total attempts on this question, including this one.
    pub attempts: u64,
    /// Correct attempts on this question, including this one if it was.
    pub correct_attempts: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
