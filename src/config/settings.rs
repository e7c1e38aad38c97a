//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the completion client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the API endpoint.
    ///
    /// - DeepSeek default: `https://api.deepseek.com`
    /// - Any OpenAI-compatible endpoint works (OpenAI, Groq, Ollama, ...).
    pub base_url: String,
    /// API key, `None` for local providers that require no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"deepseek-chat"`).
    pub model: String,
    /// Default sampling temperature (0.0 - 1.0) when a request does not set
    /// its own. Lower = more deterministic.
    pub temperature: f32,
    /// Upper bound on completion length, in tokens. Enrichment responses for
    /// long transcripts need headroom here.
    pub max_tokens: u32,
    /// Maximum seconds to wait for an LLM response before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".into(),
            api_key: None,
            model: "deepseek-chat".into(),
            temperature: 0.7,
            max_tokens: 4096,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// TranscriptConfig
// ---------------------------------------------------------------------------

/// Settings for transcript fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Caption language requested first, as an ISO-639-1 code.
    pub preferred_language: String,
    /// Language accepted when the preferred one has no caption track.
    pub fallback_language: String,
    /// How many fetch attempts are made when the provider rate-limits.
    pub fetch_retries: u32,
    /// Initial backoff in seconds; doubles after every rate-limited attempt.
    pub retry_backoff_secs: u64,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            preferred_language: "hi".into(),
            fallback_language: "en".into(),
            fetch_retries: 3,
            retry_backoff_secs: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use transcript_tutor::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion client settings.
    pub llm: LlmConfig,
    /// Transcript fetching settings.
    pub transcript: TranscriptConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
