//! Question bank: generated questions with attempt counters.
//!
//! [`QuestionBank`] stores [`QuestionRecord`]s and owns the counter updates
//! for answer submissions. A submission grades and increments under one
//! lock acquisition, so concurrent submissions from different users each
//! count exactly once. Counters only ever increment.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::enrich::{GeneratedQuestion, QuestionKind};

use super::grade::{grade, GradeError, GradeOutcome, FEEDBACK_CORRECT, FEEDBACK_INCORRECT};

// ---------------------------------------------------------------------------
// QuestionRecord
// ---------------------------------------------------------------------------

/// One stored question belonging to a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub transcript_id: String,
    pub video_id: String,
    pub video_title: String,
    pub question_text: String,
    /// Canonical correct answer.
    pub answer: String,
    pub kind: QuestionKind,
    /// Answer options for multiple choice; empty for other kinds.
    pub options: Vec<String>,
    /// Total submissions ever made against this question.
    pub attempts: u64,
    /// Submissions that graded correct.
    pub correct_attempts: u64,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Summary of one practice set: all questions of one kind for one transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeSet {
    pub transcript_id: String,
    pub title: String,
    pub video_id: String,
    pub kind: QuestionKind,
    pub question_count: usize,
}

// ---------------------------------------------------------------------------
// QuizError
// ---------------------------------------------------------------------------

/// All errors that can arise from the question bank.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuizError {
    #[error("question not found: {0}")]
    QuestionNotFound(String),

    #[error(transparent)]
    Grade(#[from] GradeError),
}

// ---------------------------------------------------------------------------
// QuestionBank
// ---------------------------------------------------------------------------

/// Thread-safe question store with optional JSON persistence.
pub struct QuestionBank {
    records: Mutex<Vec<QuestionRecord>>,
    path: Option<PathBuf>,
}

impl QuestionBank {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Open a bank backed by the JSON file at `path`, loading whatever is
    /// already there. A missing file starts an empty bank.
    pub fn open(path: PathBuf) -> Self {
        let records = load_records(&path);
        Self {
            records: Mutex::new(records),
            path: Some(path),
        }
    }

    /// An unpersisted bank (useful for tests).
    pub fn in_memory() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            path: None,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Store freshly generated questions for a transcript, returning the
    /// created records with counters at zero.
    pub fn add_generated(
        &self,
        transcript_id: &str,
        video_id: &str,
        video_title: &str,
        questions: &[GeneratedQuestion],
    ) -> Vec<QuestionRecord> {
        let now = Utc::now();
        let new_records: Vec<QuestionRecord> = questions
            .iter()
            .map(|q| QuestionRecord {
                id: Uuid::new_v4().to_string(),
                transcript_id: transcript_id.to_string(),
                video_id: video_id.to_string(),
                video_title: video_title.to_string(),
                question_text: q.question.clone(),
                answer: q.answer.clone(),
                kind: q.kind,
                options: q.options.clone(),
                attempts: 0,
                correct_attempts: 0,
                is_favorite: false,
                created_at: now,
            })
            .collect();

        let mut records = self.records.lock().unwrap();
        records.extend(new_records.iter().cloned());
        self.save(&records);
        new_records
    }

    /// Grade a submission and update the counters in one step.
    ///
    /// `attempts` is incremented unconditionally, `correct_attempts` only on
    /// a correct submission; both happen under the bank lock so concurrent
    /// submissions each count. An empty submission is rejected before either
    /// counter moves.
    pub fn submit_answer(
        &self,
        question_id: &str,
        submitted: &str,
    ) -> Result<GradeOutcome, QuizError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == question_id)
            .ok_or_else(|| QuizError::QuestionNotFound(question_id.to_string()))?;

        let is_correct = grade(submitted, &record.answer)?;

        record.attempts += 1;
        if is_correct {
            record.correct_attempts += 1;
        }

        let outcome = GradeOutcome {
            is_correct,
            correct_answer: if is_correct {
                None
            } else {
                Some(record.answer.trim().to_string())
            },
            feedback: if is_correct {
                FEEDBACK_CORRECT
            } else {
                FEEDBACK_INCORRECT
            },
            attempts: record.attempts,
            correct_attempts: record.correct_attempts,
        };

        log::debug!(
            "question {question_id}: attempts {} / correct {}",
            outcome.attempts,
            outcome.correct_attempts
        );
        self.save(&records);
        Ok(outcome)
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&self, question_id: &str) -> Result<bool, QuizError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == question_id)
            .ok_or_else(|| QuizError::QuestionNotFound(question_id.to_string()))?;

        record.is_favorite = !record.is_favorite;
        let flag = record.is_favorite;
        self.save(&records);
        Ok(flag)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get(&self, question_id: &str) -> Option<QuestionRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == question_id)
            .cloned()
    }

    /// All questions of one kind for one video, in insertion order.
    pub fn for_video(&self, video_id: &str, kind: QuestionKind) -> Vec<QuestionRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.video_id == video_id && r.kind == kind)
            .cloned()
            .collect()
    }

    /// Per-kind question counts for one transcript, used to build
    /// [`PracticeSet`] summaries. Kinds with no questions are omitted.
    pub fn counts_by_kind(&self, transcript_id: &str) -> Vec<(QuestionKind, usize)> {
        let records = self.records.lock().unwrap();

        [QuestionKind::Novice, QuestionKind::Mcq, QuestionKind::FillBlanks]
            .into_iter()
            .filter_map(|kind| {
                let count = records
                    .iter()
                    .filter(|r| r.transcript_id == transcript_id && r.kind == kind)
                    .count();
                (count > 0).then_some((kind, count))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn save(&self, records: &[QuestionRecord]) {
        let Some(path) = &self.path else { return };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(records) {
            let _ = std::fs::write(path, data);
        }
    }
}

fn load_records(path: &Path) -> Vec<QuestionRecord> {
    if path.exists() {
        let data = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&data).unwrap_or_default()
    } else {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
