//! Per-user word lists.
//!
//! A [`UserWord`] joins one user to one [`DictionaryEntry`] and carries the
//! user's private state for that word. The record is created at most once
//! per (user, entry) pair: repeated queries of the same word must never
//! reset notes or the mastered flag, so [`UserWordList::ensure`] only writes
//! creation fields on first insert.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::enrich::WordMeaning;

use super::dictionary::WordDictionary;

// ---------------------------------------------------------------------------
// UserWord
// ---------------------------------------------------------------------------

/// One user's relationship with one dictionary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWord {
    pub id: String,
    pub user_id: String,
    /// Id of the [`DictionaryEntry`] this record points at.
    pub entry_id: String,
    pub is_mastered: bool,
    pub is_favorite: bool,
    /// Free-text personal notes, empty by default.
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user word joined with its dictionary entry, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct UserWordView {
    pub entry_id: String,
    pub word: String,
    pub meaning: WordMeaning,
    pub frequency: u64,
    pub is_mastered: bool,
    pub is_favorite: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// VocabError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VocabError {
    /// The (user, entry) pair has no record in the list.
    #[error("word not found in user's list: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// UserWordList
// ---------------------------------------------------------------------------

/// Thread-safe store of user-word records with optional JSON persistence.
pub struct UserWordList {
    records: Mutex<Vec<UserWord>>,
    path: Option<PathBuf>,
}

impl UserWordList {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Open a list backed by the JSON file at `path`, loading whatever is
    /// already there. A missing file starts an empty list.
    pub fn open(path: PathBuf) -> Self {
        let records = load_records(&path);
        Self {
            records: Mutex::new(records),
            path: Some(path),
        }
    }

    /// An unpersisted list (useful for tests).
    pub fn in_memory() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            path: None,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Upsert with set-on-insert-only semantics: create the (user, entry)
    /// record with defaults if it does not exist, return the existing one
    /// untouched otherwise.
    pub fn ensure(&self, user_id: &str, entry_id: &str) -> UserWord {
        let mut records = self.records.lock().unwrap();

        if let Some(existing) = records
            .iter()
            .find(|r| r.user_id == user_id && r.entry_id == entry_id)
        {
            return existing.clone();
        }

        let now = Utc::now();
        let record = UserWord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            entry_id: entry_id.to_string(),
            is_mastered: false,
            is_favorite: false,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        self.save(&records);
        record
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&self, user_id: &str, entry_id: &str) -> Result<bool, VocabError> {
        self.update(user_id, entry_id, |record| {
            record.is_favorite = !record.is_favorite;
            record.is_favorite
        })
    }

    /// Replace the user's notes for a word (trimmed).
    pub fn set_notes(&self, user_id: &str, entry_id: &str, notes: &str) -> Result<(), VocabError> {
        self.update(user_id, entry_id, |record| {
            record.notes = notes.trim().to_string();
        })
    }

    /// Mark a word mastered (or not).
    pub fn set_mastered(
        &self,
        user_id: &str,
        entry_id: &str,
        mastered: bool,
    ) -> Result<(), VocabError> {
        self.update(user_id, entry_id, |record| {
            record.is_mastered = mastered;
        })
    }

    fn update<T>(
        &self,
        user_id: &str,
        entry_id: &str,
        apply: impl FnOnce(&mut UserWord) -> T,
    ) -> Result<T, VocabError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.user_id == user_id && r.entry_id == entry_id)
            .ok_or_else(|| VocabError::NotFound(entry_id.to_string()))?;

        record.updated_at = Utc::now();
        let result = apply(record);
        self.save(&records);
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// One user's words joined against the dictionary, newest first.
    ///
    /// Records whose dictionary entry has vanished are skipped rather than
    /// surfaced as errors; a stale join record is not the reader's problem.
    pub fn words_for_user(
        &self,
        dictionary: &WordDictionary,
        user_id: &str,
        favorites_only: bool,
    ) -> Vec<UserWordView> {
        let records = self.records.lock().unwrap();

        let mut views: Vec<UserWordView> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| !favorites_only || r.is_favorite)
            .filter_map(|r| {
                let entry = dictionary.get(&r.entry_id)?;
                Some(UserWordView {
                    entry_id: entry.id,
                    word: entry.word,
                    meaning: entry.meaning,
                    frequency: entry.frequency,
                    is_mastered: r.is_mastered,
                    is_favorite: r.is_favorite,
                    notes: r.notes.clone(),
                    created_at: r.created_at,
                })
            })
            .collect();

        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        views
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

    fn save(&self, records: &[UserWord]) {
        let Some(path) = &self.path else { return };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(records) {
            let _ = std::fs::write(path, data);
        }
    }
}

fn load_records(path: &Path) -> Vec<UserWord> {
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
