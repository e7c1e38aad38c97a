//! Quiz grading and question storage.
//!
//! This module provides:
//! * [`grade`] — pure submitted-vs-canonical answer comparison.
//! * [`GradeOutcome`] — correctness, feedback and updated counters.
//! * [`QuestionBank`] / [`QuestionRecord`] — generated questions with
//!   attempt counters, persisted as JSON.
//! * [`QuizError`] / [`GradeError`] — error variants for the quiz path.

pub mod bank;
pub mod grade;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use bank::{PracticeSet, QuestionBank, QuestionRecord, QuizError};
pub use grade::{grade, GradeError, GradeOutcome};
