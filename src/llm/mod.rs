//! LLM completion module.
//!
//! This module provides:
//! * [`LlmClient`] — async trait implemented by all completion backends.
//! * [`ApiClient`] — OpenAI-compatible REST API client (DeepSeek defaults).
//! * [`CompletionRequest`] — typed (system, user, temperature) request.
//! * [`PromptBuilder`] — builds enrichment / question / word-meaning prompts.
//! * [`LlmError`] — error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use transcript_tutor::config::AppConfig;
//! use transcript_tutor::llm::{ApiClient, LlmClient, PromptBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = ApiClient::from_config(&config.llm);
//!     let prompts = PromptBuilder::new();
//!
//!     let request = prompts.word_meaning("नमस्ते");
//!     let completion = client.complete(&request).await.unwrap();
//!     println!("{}", completion);
//! }
//! ```

pub mod client;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiClient, CompletionRequest, LlmClient, LlmError};
pub use prompt::PromptBuilder;
