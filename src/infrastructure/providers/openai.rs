//! OpenAI-compatible chat-completions backend
//!
//! One adapter covers every provider speaking the chat-completions wire
//! format: the OpenAI API itself, DeepSeek, and user-supplied custom
//! endpoints. The constructors differ in URL, wire model, and whether a
//! credential is required.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::error::BackendError;

use super::ModelBackend;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEEPSEEK_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat-completions adapter for OpenAI, DeepSeek, and custom endpoints
pub struct ChatBackend {
    client: Client,
    provider_id: &'static str,
    url: String,
    api_key: Option<String>,
    /// Wire model name; custom endpoints choose their own model server-side
    model: Option<String>,
    /// Custom endpoints may run unauthenticated; the hosted APIs may not
    key_required: bool,
    max_tokens: Option<u32>,
}

impl ChatBackend {
    /// The OpenAI API (GPT-4.1 mini tier)
    pub fn openai(api_key: Option<String>) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT_SECS),
            provider_id: "openai",
            url: OPENAI_URL.to_string(),
            api_key,
            model: Some("gpt-4-turbo-preview".to_string()),
            key_required: true,
            max_tokens: Some(4096),
        }
    }

    /// The DeepSeek chat API
    pub fn deepseek(api_key: Option<String>) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT_SECS),
            provider_id: "deepseek",
            url: DEEPSEEK_URL.to_string(),
            api_key,
            model: Some("deepseek-chat".to_string()),
            key_required: true,
            max_tokens: Some(8192),
        }
    }

    /// A user-configured OpenAI-compatible endpoint
    pub fn custom(endpoint: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT_SECS),
            provider_id: "custom",
            url: endpoint.unwrap_or_default(),
            api_key,
            model: None,
            key_required: false,
            max_tokens: None,
        }
    }

    /// Override the endpoint URL (tests, proxies)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.client = build_client(seconds);
        self
    }
}

#[async_trait]
impl ModelBackend for ChatBackend {
    fn provider_id(&self) -> &'static str {
        self.provider_id
    }

    async fn send(&self, prompt: &str) -> Result<String, BackendError> {
        if self.url.is_empty() {
            return Err(BackendError::missing_credential(
                self.provider_id,
                "endpoint URL",
            ));
        }
        if self.key_required && self.api_key.is_none() {
            return Err(BackendError::missing_credential(self.provider_id, "API key"));
        }

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.1,
            max_tokens: self.max_tokens,
        };

        debug!(provider = self.provider_id, "sending chat-completions request");

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::transport(self.provider_id, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(provider = self.provider_id, status = %status, "chat API error: {}", text);
            return Err(BackendError::http(self.provider_id, status.as_u16(), text));
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::malformed(self.provider_id, &e.to_string()))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                BackendError::malformed(self.provider_id, "no message content in response")
            })
    }
}

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            error!(error = %e, "failed to build HTTP client with timeout, using default client");
            Client::new()
        })
}

// === Chat-completions API types ===

#[derive(Debug, Serialize)]
struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
