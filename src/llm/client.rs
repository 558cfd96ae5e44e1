//! OpenAI-compatible chat completions client.
//!
//! One request per run: a single user message carrying the whole prompt.
//! Failures are mapped to [`BackendError`] and never retried.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Configuration;
use crate::error::BackendError;

/// Base URL used when the configuration does not set one.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Token usage reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Raw generated text plus optional usage counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub raw_text: String,
    pub usage: Option<Usage>,
}

/// Trait for the text-generation backend.
///
/// This abstraction allows mocking the HTTP backend in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send `prompt` as a single user turn using the model settings in `config`.
    async fn generate(
        &self,
        prompt: &str,
        config: &Configuration,
    ) -> Result<GenerationResult, BackendError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// HTTP client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Default)]
pub struct OpenAiClient {
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Join the configured base URL with the completions path.
pub fn completions_url(config: &Configuration) -> String {
    let base = config
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);
    format!("{}/chat/completions", base.trim_end_matches('/'))
}

#[async_trait]
impl GenerationBackend for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &Configuration,
    ) -> Result<GenerationResult, BackendError> {
        let url = completions_url(config);
        let request = ChatRequest {
            model: &config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: config.effective_max_tokens(),
        };

        debug!(
            "POST {} model={} max_tokens={:?}",
            url, request.model, request.max_tokens
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let body = response.text().await.map_err(BackendError::Transport)?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let raw_text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(BackendError::EmptyResponse)?;

        Ok(GenerationResult {
            raw_text,
            usage: parsed.usage,
        })
    }
}

fn status_error(status: StatusCode, body: String) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized {
            status: status.as_u16(),
            body,
        },
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited { body },
        _ => BackendError::Api {
            status: status.as_u16(),
            body,
        },
    }
}
