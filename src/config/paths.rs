//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (config dir, settings + store files):
//!
//!   Windows: %APPDATA%\transcript-tutor\
//!   macOS:   ~/Library/Application Support/transcript-tutor/
//!   Linux:   ~/.config/transcript-tutor/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and the JSON store files.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the shared word dictionary store.
    pub dictionary_file: PathBuf,
    /// Full path to the per-user word list store.
    pub user_words_file: PathBuf,
    /// Full path to the transcript record store.
    pub transcripts_file: PathBuf,
    /// Full path to the question bank store.
    pub questions_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "transcript-tutor";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let dictionary_file = config_dir.join("dictionary.json");
        let user_words_file = config_dir.join("user-words.json");
        let transcripts_file = config_dir.join("transcripts.json");
        let questions_file = config_dir.join("questions.json");

        Self {
            config_dir,
            settings_file,
            dictionary_file,
            user_words_file,
            transcripts_file,
            questions_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
