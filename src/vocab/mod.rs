//! Vocabulary tracking.
//!
//! Two stores cooperate here:
//! * [`WordDictionary`] — one shared, deduplicated entry per queried word,
//!   with a frequency counter bumped on every lookup by any user.
//! * [`UserWordList`] — a join record per (user, dictionary entry) carrying
//!   personal state: mastered flag, favorite flag, free-text notes.
//!
//! The split mirrors the difference between "what a word means" (global,
//! paid for once per word with an LLM call) and "where this learner stands
//! with it" (private, never shared).

pub mod dictionary;
pub mod user_words;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use dictionary::{DictionaryEntry, WordDictionary};
pub use user_words::{UserWord, UserWordList, UserWordView, VocabError};
