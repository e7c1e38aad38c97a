//! Core library for a Hindi-learning backend built around YouTube video
//! transcripts.
//!
//! The crate turns raw caption tracks into study material:
//!
//! * [`transcript`] — video-id extraction, the transcript-source seam with
//!   retry handling, caption formatting, and the transcript record store.
//! * [`llm`] — completion client for an OpenAI-compatible endpoint plus the
//!   prompt builder for enrichment, question generation, and word meanings.
//! * [`enrich`] — tolerant parsing and validation of the model's JSON
//!   completions (punctuated text, translation, vocabulary, question sets).
//! * [`quiz`] — answer grading and the question bank with attempt counters.
//! * [`vocab`] — the shared word dictionary and per-user word lists.
//! * [`pipeline`] — the orchestrator tying the above together.
//! * [`config`] — TOML-persisted settings and platform paths.
//!
//! The crate owns no HTTP routes and no CLI; it is the library layer an
//! enclosing request handler calls into. Network-facing collaborators (the
//! transcript provider and the LLM backend) are injected through the
//! [`transcript::TranscriptSource`] and [`llm::LlmClient`] traits.

pub mod config;
pub mod enrich;
pub mod llm;
pub mod pipeline;
pub mod quiz;
pub mod transcript;
pub mod vocab;
