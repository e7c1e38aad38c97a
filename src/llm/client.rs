//! Core `LlmClient` trait and `ApiClient` implementation.
//!
//! `ApiClient` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! — DeepSeek, OpenAI, Groq, Ollama (OpenAI mode), vLLM, etc.
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while obtaining a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionRequest
// ---------------------------------------------------------------------------

/// One chat-completion call: system instruction, user message, and an
/// optional per-request temperature override.
///
/// Built by [`PromptBuilder`](crate::llm::PromptBuilder); the enrichment
/// prompt pins a low temperature for format stability while word and
/// question prompts use the configured default.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    /// `None` means use the temperature from [`LlmConfig`].
    pub temperature: Option<f32>,
}

// ---------------------------------------------------------------------------
// LlmClient trait
// ---------------------------------------------------------------------------

/// Async trait for completion backends.
///
/// Implementors must be `Send + Sync` so they can be shared across requests
/// (e.g. wrapped in `Arc<dyn LlmClient>`). The client is constructed
/// explicitly and injected into the pipeline; the response parsers in
/// [`crate::enrich`] take no dependency on it.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Submit `request` and return the raw text completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// Compile-time assertion: Box<dyn LlmClient> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn LlmClient>) {}
};

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Works with: DeepSeek, OpenAI, Groq, Together.ai, Ollama (OpenAI mode),
/// vLLM — any provider that speaks the OpenAI chat-completions wire format.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `model`) come exclusively
/// from the [`LlmConfig`] passed to [`ApiClient::from_config`].
pub struct ApiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl LlmClient for ApiClient {
    /// Send `request` to the configured OpenAI-compatible endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty — safe for
    /// Ollama and other local providers that require no authentication.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user",   "content": request.user   }
            ],
            "stream":      false,
            "temperature": request.temperature.unwrap_or(self.config.temperature),
            "max_tokens":  self.config.max_tokens
        });

        let mut req = self.client.post(&url).json(&body);

        // Attach Authorization header only when api_key is a non-empty string.
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let completion = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .to_string();

        if completion.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(completion)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            base_url: "https://api.deepseek.com".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "deepseek-chat".into(),
            temperature: 0.7,
            max_tokens: 4096,
            timeout_secs: 60,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let config = make_config(None);
        let _client = ApiClient::from_config(&config);
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let config = make_config(Some(""));
        let _client = ApiClient::from_config(&config);
    }

    #[test]
    fn from_config_accepts_real_api_key() {
        let config = make_config(Some("sk-test-1234"));
        let _client = ApiClient::from_config(&config);
    }

    /// Verify that `ApiClient` is object-safe (usable as `dyn LlmClient`).
    #[test]
    fn client_is_object_safe() {
        let config = make_config(None);
        let client: Box<dyn LlmClient> = Box::new(ApiClient::from_config(&config));
        // Just holding the trait object is sufficient to verify object-safety.
        drop(client);
    }

    #[test]
    fn completion_request_carries_temperature_override() {
        let request = CompletionRequest {
            system: "system".into(),
            user: "user".into(),
            temperature: Some(0.1),
        };
        assert_eq!(request.temperature, Some(0.1));
    }
}
