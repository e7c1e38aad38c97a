//! Transcript records and their store.
//!
//! [`TranscriptLibrary`] keeps one [`TranscriptRecord`] per (user, video)
//! pair. Records are held in memory behind a lock and, when the library was
//! opened with a path, written back as pretty-printed JSON after every
//! mutation so they survive restarts.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::enrich::EnrichedTranscript;

// ---------------------------------------------------------------------------
// TranscriptRecord
// ---------------------------------------------------------------------------

/// One ingested video transcript belonging to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    pub title: String,
    /// Formatted caption text (see [`crate::transcript::format_transcript`]).
    pub content: String,
    /// Language the caption provider settled on.
    pub language: String,
    /// Punctuation/translation/vocabulary, attached once processing ran.
    pub enrichment: Option<EnrichedTranscript>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// LibraryError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    #[error("transcript not found: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// TranscriptLibrary
// ---------------------------------------------------------------------------

/// Thread-safe store of transcript records with optional JSON persistence.
pub struct TranscriptLibrary {
    records: Mutex<Vec<TranscriptRecord>>,
    path: Option<PathBuf>,
}

impl TranscriptLibrary {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Open a library backed by the JSON file at `path`, loading whatever is
    /// already there. A missing file starts an empty library.
    pub fn open(path: PathBuf) -> Self {
        let records = load_records(&path);
        Self {
            records: Mutex::new(records),
            path: Some(path),
        }
    }

    /// An unpersisted library (useful for tests and callers that bring their
    /// own storage).
    pub fn in_memory() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            path: None,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Create and store a new record, returning a clone of it.
    pub fn create(
        &self,
        user_id: &str,
        video_id: &str,
        title: &str,
        content: &str,
        language: &str,
    ) -> TranscriptRecord {
        let now = Utc::now();
        let record = TranscriptRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            video_id: video_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            language: language.to_string(),
            enrichment: None,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        };

        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        self.save(&records);
        record
    }

    /// Attach an enrichment result to an existing record.
    pub fn attach_enrichment(
        &self,
        id: &str,
        enrichment: EnrichedTranscript,
    ) -> Result<(), LibraryError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;

        record.enrichment = Some(enrichment);
        record.updated_at = Utc::now();
        self.save(&records);
        Ok(())
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool, LibraryError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;

        record.is_favorite = !record.is_favorite;
        record.updated_at = Utc::now();
        let flag = record.is_favorite;
        self.save(&records);
        Ok(flag)
    }

    /// Remove a record.
    pub fn remove(&self, id: &str) -> Result<(), LibraryError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(LibraryError::NotFound(id.to_string()));
        }
        self.save(&records);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<TranscriptRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// The record for a (user, video) pair, if the video was ingested before.
    pub fn find_by_video(&self, user_id: &str, video_id: &str) -> Option<TranscriptRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.video_id == video_id)
            .cloned()
    }

    /// All of one user's transcripts, newest first.
    pub fn list_for_user(&self, user_id: &str) -> Vec<TranscriptRecord> {
        let mut list: Vec<TranscriptRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
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

    fn save(&self, records: &[TranscriptRecord]) {
        let Some(path) = &self.path else { return };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(records) {
            let _ = std::fs::write(path, data);
        }
    }
}

fn load_records(path: &Path) -> Vec<TranscriptRecord> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(library: &TranscriptLibrary) -> TranscriptRecord {
        library.create(
            "user-1",
            "dQw4w9WgXcQ",
            "हिंदी पाठ 1",
            "नमस्ते दोस्तों आज हम सीखेंगे",
            "hi",
        )
    }

    fn sample_enrichment() -> EnrichedTranscript {
        EnrichedTranscript {
            punctuated_text: "नमस्ते दोस्तों। आज हम सीखेंगे।".into(),
            translation: "Hello friends. Today we will learn.".into(),
            vocabulary: vec![],
        }
    }

    #[test]
    fn create_and_get() {
        let library = TranscriptLibrary::in_memory();
        let record = sample(&library);

        let fetched = library.get(&record.id).expect("record should exist");
        assert_eq!(fetched.video_id, "dQw4w9WgXcQ");
        assert_eq!(fetched.language, "hi");
        assert!(fetched.enrichment.is_none());
        assert!(!fetched.is_favorite);
    }

    #[test]
    fn find_by_video_matches_user_and_video() {
        let library = TranscriptLibrary::in_memory();
        sample(&library);

        assert!(library.find_by_video("user-1", "dQw4w9WgXcQ").is_some());
        assert!(library.find_by_video("user-2", "dQw4w9WgXcQ").is_none());
        assert!(library.find_by_video("user-1", "otherVideo0").is_none());
    }

    #[test]
    fn attach_enrichment_updates_record() {
        let library = TranscriptLibrary::in_memory();
        let record = sample(&library);

        library
            .attach_enrichment(&record.id, sample_enrichment())
            .expect("attach");

        let fetched = library.get(&record.id).unwrap();
        let enrichment = fetched.enrichment.expect("enrichment attached");
        assert_eq!(enrichment.translation, "Hello friends. Today we will learn.");
        assert!(fetched.updated_at >= fetched.created_at);
    }

    #[test]
    fn attach_enrichment_unknown_id_errors() {
        let library = TranscriptLibrary::in_memory();
        let err = library
            .attach_enrichment("missing", sample_enrichment())
            .unwrap_err();
        assert_eq!(err, LibraryError::NotFound("missing".into()));
    }

    #[test]
    fn toggle_favorite_flips() {
        let library = TranscriptLibrary::in_memory();
        let record = sample(&library);

        assert!(library.toggle_favorite(&record.id).unwrap());
        assert!(!library.toggle_favorite(&record.id).unwrap());
    }

    #[test]
    fn remove_deletes_record() {
        let library = TranscriptLibrary::in_memory();
        let record = sample(&library);

        library.remove(&record.id).expect("remove");
        assert!(library.get(&record.id).is_none());
        assert!(library.remove(&record.id).is_err());
    }

    #[test]
    fn list_for_user_is_newest_first() {
        let library = TranscriptLibrary::in_memory();
        let first = library.create("user-1", "videoAAAAAA", "पहला", "एक", "hi");
        let second = library.create("user-1", "videoBBBBBB", "दूसरा", "दो", "hi");
        library.create("user-2", "videoCCCCCC", "और", "तीन", "hi");

        let list = library.list_for_user("user-1");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[test]
    fn persists_and_reloads() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("transcripts.json");

        let record_id = {
            let library = TranscriptLibrary::open(path.clone());
            let record = sample(&library);
            library
                .attach_enrichment(&record.id, sample_enrichment())
                .expect("attach");
            record.id
        };

        let reloaded = TranscriptLibrary::open(path);
        assert_eq!(reloaded.len(), 1);
        let fetched = reloaded.get(&record_id).expect("record survives reload");
        assert!(fetched.enrichment.is_some());
    }
}
