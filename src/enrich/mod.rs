//! Tolerant parsing and validation of LLM completions.
//!
//! The model is instructed to return bare JSON, but a free-text completion
//! endpoint can still wrap the object in prose or markdown fences, or cut it
//! off at a length limit. This module recovers the intended object when it is
//! recoverable and reports a typed failure when it is not:
//!
//! * [`parse_enriched_transcript`] — punctuated text + translation +
//!   vocabulary for a processed transcript.
//! * [`parse_question_set`] — graded question/answer pairs.
//! * [`parse_word_meaning`] — one word's meaning and bilingual example.
//! * [`EnrichError`] — malformed / truncated / schema-violation variants.
//!
//! Every parser is a pure, synchronous function of a string: no client
//! handle, no retries, no shared state. Callers that want to retry the
//! underlying completion do so themselves.
//!
//! Whatever extraction path succeeds, schema validation is always the final
//! gate, so a caller never receives a structurally incomplete record.

pub mod extract;
pub mod questions;
pub mod transcript;
pub mod word;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use extract::EnrichError;
pub use questions::{parse_question_set, GeneratedQuestion, QuestionKind};
pub use transcript::{
    parse_enriched_transcript, BilingualExample, EnrichedTranscript, VocabularyItem,
};
pub use word::{parse_word_meaning, WordMeaning};
