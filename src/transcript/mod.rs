//! Transcript acquisition and storage.
//!
//! This module provides:
//! * [`extract_video_id`] — pull an 11-character video id out of the URL
//!   shapes users paste (watch, short, embed, or a bare id).
//! * [`TranscriptSource`] — async trait over the external caption provider;
//!   the real client lives outside this crate.
//! * [`RetryingSource`] — wraps any source with backoff on rate limits.
//! * [`format_transcript`] / [`normalize_whitespace`] — turn raw caption
//!   segments into clean prose ready for prompting.
//! * [`TranscriptLibrary`] / [`TranscriptRecord`] — per-user transcript
//!   records with JSON persistence.

pub mod fetch;
pub mod format;
pub mod library;
pub mod video;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use fetch::{
    CaptionSegment, FetchError, FetchedTranscript, RetryingSource, TranscriptSource,
};
pub use format::{format_transcript, normalize_whitespace};
pub use library::{LibraryError, TranscriptLibrary, TranscriptRecord};
pub use video::extract_video_id;
