//! Model backend adapters
//!
//! One uniform [`ModelBackend`] interface over the remote LLM providers.
//! Each adapter performs a single bounded request/response cycle: build the
//! provider-specific body, attach the provider-specific auth, issue the
//! call, extract the single completion text from the provider-specific
//! envelope. No retries and no streaming live at this layer.

mod gemini;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::{AnalysisError, BackendError};
use crate::domain::model::{ModelChoice, ModelKind};

pub use gemini::GeminiBackend;
pub use openai::ChatBackend;

/// A remote LLM provider integration
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Stable provider identifier, used in error reports
    fn provider_id(&self) -> &'static str;

    /// Send one prompt and return the completion text. Single attempt.
    async fn send(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Build the adapter for a model choice.
///
/// Dispatch is an exhaustive match over the closed model set; a tag the
/// engine does not recognize is a configuration mistake and fails here.
pub fn backend_for(choice: &ModelChoice) -> Result<Arc<dyn ModelBackend>, AnalysisError> {
    match &choice.kind {
        ModelKind::GeminiFlash => Ok(Arc::new(GeminiBackend::new(choice.api_key.clone()))),
        ModelKind::DeepSeekV3 => Ok(Arc::new(ChatBackend::deepseek(choice.api_key.clone()))),
        ModelKind::Gpt41Mini => Ok(Arc::new(ChatBackend::openai(choice.api_key.clone()))),
        ModelKind::Custom => Ok(Arc::new(ChatBackend::custom(
            choice.endpoint.clone(),
            choice.api_key.clone(),
        ))),
        ModelKind::Unrecognized(tag) => Err(AnalysisError::UnsupportedModel(tag.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for_known_kinds() {
        let backend = backend_for(&ModelChoice::gemini_flash("key")).unwrap();
        assert_eq!(backend.provider_id(), "gemini");

        let backend = backend_for(&ModelChoice::deepseek("key")).unwrap();
        assert_eq!(backend.provider_id(), "deepseek");

        let backend = backend_for(&ModelChoice::gpt_41_mini("key")).unwrap();
        assert_eq!(backend.provider_id(), "openai");

        let backend =
            backend_for(&ModelChoice::custom("https://llm.internal/v1/chat", None)).unwrap();
        assert_eq!(backend.provider_id(), "custom");
    }

    #[test]
    fn test_backend_for_unrecognized_fails() {
        let choice = ModelChoice::new(ModelKind::parse("llama-9"));
        let err = backend_for(&choice).err().unwrap();
        assert_eq!(err, AnalysisError::UnsupportedModel("llama-9".to_string()));
    }
}
