//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the LLM and
//! transcript subsystems, `AppPaths` for cross-platform data directories, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, LlmConfig, TranscriptConfig};
