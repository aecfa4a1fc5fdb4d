//! Common test utilities and mock implementations

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use jshunter_analysis::{BackendError, ModelBackend};

/// What the mock should do for one call
pub struct MockReply {
    pub delay_ms: u64,
    pub outcome: Result<String, BackendError>,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            outcome: Ok(text.into()),
        }
    }

    pub fn error(err: BackendError) -> Self {
        Self {
            delay_ms: 0,
            outcome: Err(err),
        }
    }

    pub fn after_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

type Responder = Box<dyn Fn(&str) -> MockReply + Send + Sync>;

/// Mock model backend for orchestrator tests
pub struct MockBackend {
    responder: Responder,
    /// Captured prompts for verification, in call order
    pub captured_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Reply to every call with the same text
    pub fn with_response(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::with_responder(move |_| MockReply::text(text.clone()))
    }

    /// Fail every call with the same error
    pub fn with_error(err: BackendError) -> Self {
        Self::with_responder(move |_| MockReply::error(err.clone()))
    }

    /// Compute the reply from the prompt
    pub fn with_responder(responder: impl Fn(&str) -> MockReply + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            captured_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    fn provider_id(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, prompt: &str) -> Result<String, BackendError> {
        self.captured_prompts.lock().await.push(prompt.to_string());

        let reply = (self.responder)(prompt);
        if reply.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(reply.delay_ms)).await;
        }
        reply.outcome
    }
}

/// A fenced-JSON secret-scan reply with one finding carrying `value`
pub fn secret_finding_response(value: &str) -> String {
    format!(
        "```json\n{{\"findings\":[{{\"type\":\"token\",\"value\":\"{}\",\"riskLevel\":\"low\"}}]}}\n```",
        value
    )
}
