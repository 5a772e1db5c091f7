//! Chat-completion client.
//!
//! [`OpenAiClient`] talks to any OpenAI-compatible `/chat/completions`
//! endpoint. [`MockCompletionClient`] returns canned replies for tests.
//! Neither retries.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Completion errors.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Model API key is not configured")]
    MissingApiKey,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model API returned {status}")]
    Upstream { status: u16, body: String },

    #[error("Unreadable model API response: {0}")]
    ResponseParsing(String),
}

/// Something that turns a prompt into the model's reply text.
///
/// `Ok(None)` means the call succeeded but the reply carried no content.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, CompletionError>;
}

/// Connection settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

/// HTTP client for OpenAI-compatible chat completions.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            model: config.model,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Request body for `/chat/completions`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from `/chat/completions`. Only the content is read.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    CompletionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), model = %self.model, "Model API error");
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        tracing::debug!(
            model = %self.model,
            content_len = content.as_ref().map_or(0, String::len),
            "Model reply received"
        );

        Ok(content)
    }
}

/// Canned reply for [`MockCompletionClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Empty,
    Upstream { status: u16, body: String },
}

/// Mock client for testing without a model API.
pub struct MockCompletionClient {
    reply: MockReply,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, _prompt: &str) -> Result<Option<String>, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            MockReply::Text(text) => Ok(Some(text.clone())),
            MockReply::Empty => Ok(None),
            MockReply::Upstream { status, body } => Err(CompletionError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
