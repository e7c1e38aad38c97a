//! Pipeline orchestration.
//!
//! [`TutorPipeline`] wires the collaborators together and drives the flows a
//! request handler exposes: ingest a video, enrich its transcript, generate
//! and answer quiz questions, query words. See [`runner`] for the flow
//! details.

pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineError, PracticeSheet, TutorPipeline, WordQueryResult};
