//! Shared word dictionary.
//!
//! [`WordDictionary`] holds one [`DictionaryEntry`] per distinct word ever
//! queried, shared across all users. An entry is created on the first query
//! (the caller pays for the LLM call) and every later query, by anyone,
//! bumps its frequency counter. Entries persist as JSON after every
//! mutation when the dictionary was opened with a path.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enrich::WordMeaning;

// ---------------------------------------------------------------------------
// DictionaryEntry
// ---------------------------------------------------------------------------

/// One globally shared word definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: String,
    /// The word as first queried, trimmed.
    pub word: String,
    pub meaning: WordMeaning,
    /// How many times any user has queried this word. Only ever grows.
    pub frequency: u64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// WordDictionary
// ---------------------------------------------------------------------------

/// Thread-safe dictionary store with optional JSON persistence.
pub struct WordDictionary {
    entries: Mutex<Vec<DictionaryEntry>>,
    path: Option<PathBuf>,
}

impl WordDictionary {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Open a dictionary backed by the JSON file at `path`, loading whatever
    /// is already there. A missing file starts an empty dictionary.
    pub fn open(path: PathBuf) -> Self {
        let entries = load_entries(&path);
        Self {
            entries: Mutex::new(entries),
            path: Some(path),
        }
    }

    /// An unpersisted dictionary (useful for tests).
    pub fn in_memory() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            path: None,
        }
    }

    // -----------------------------------------------------------------------
    // Queries and mutation
    // -----------------------------------------------------------------------

    /// Look up `word` and count the query.
    ///
    /// Tries an exact match first, then a relaxed match that ignores case
    /// and surrounding whitespace in the stored word. On a hit the entry's
    /// frequency is bumped and the updated entry returned; `None` means the
    /// word is unknown and the caller should obtain a meaning and
    /// [`insert`](Self::insert) it.
    ///
    /// When several stored entries collide under the relaxed match the first
    /// in insertion order wins; the ordering among near-duplicates carries
    /// no meaning.
    pub fn query(&self, word: &str) -> Option<DictionaryEntry> {
        let word = word.trim();
        let mut entries = self.entries.lock().unwrap();

        let index = entries
            .iter()
            .position(|e| e.word == word)
            .or_else(|| find_similar(&entries, word))?;

        let entry = &mut entries[index];
        entry.frequency += 1;
        entry.last_updated = Utc::now();
        let hit = entry.clone();

        self.save(&entries);
        log::debug!("dictionary hit for {:?} (frequency {})", hit.word, hit.frequency);
        Some(hit)
    }

    /// Store a freshly resolved word with `frequency = 1`.
    pub fn insert(&self, word: &str, meaning: WordMeaning) -> DictionaryEntry {
        let now = Utc::now();
        let entry = DictionaryEntry {
            id: Uuid::new_v4().to_string(),
            word: word.trim().to_string(),
            meaning,
            frequency: 1,
            created_at: now,
            last_updated: now,
        };

        let mut entries = self.entries.lock().unwrap();
        entries.push(entry.clone());
        self.save(&entries);
        log::info!("new dictionary entry {:?}", entry.word);
        entry
    }

    pub fn get(&self, id: &str) -> Option<DictionaryEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// The `n` most-queried words, highest frequency first.
    pub fn trending(&self, n: usize) -> Vec<DictionaryEntry> {
        let mut sorted = self.entries.lock().unwrap().clone();
        sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        sorted.truncate(n);
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn save(&self, entries: &[DictionaryEntry]) {
        let Some(path) = &self.path else { return };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(entries) {
            let _ = std::fs::write(path, data);
        }
    }
}

/// Relaxed lookup: case-insensitive, tolerating stray whitespace around the
/// stored word. First match in insertion order wins.
fn find_similar(entries: &[DictionaryEntry], word: &str) -> Option<usize> {
    let pattern = format!(r"(?i)^\s*{}\s*$", regex::escape(word));
    let matcher = Regex::new(&pattern).ok()?;
    entries.iter().position(|e| matcher.is_match(&e.word))
}

fn load_entries(path: &Path) -> Vec<DictionaryEntry> {
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
