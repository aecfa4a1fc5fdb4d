//! Engine error types
//!
//! Typed failures for the dispatch pipeline. `Analyzer::analyze` never
//! surfaces these to the caller directly; every failure mode ends up as
//! status + message data on the returned result. The types exist so that
//! chunk-level failures can be caught and recorded without aborting
//! sibling chunks.

use std::fmt;

use crate::domain::scenario::AnalysisScenario;

/// Failure of a single backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// Provider identifier ("gemini", "deepseek", "openai", "custom")
    pub provider: &'static str,
    /// HTTP status, when the provider answered at all
    pub status: Option<u16>,
    /// Error message
    pub message: String,
}

impl BackendError {
    /// A required credential or endpoint was not configured
    pub fn missing_credential(provider: &'static str, what: &str) -> Self {
        Self {
            provider,
            status: None,
            message: format!("{} not configured", what),
        }
    }

    /// The provider answered with a non-2xx status
    pub fn http(provider: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            provider,
            status: Some(status),
            message: body.into(),
        }
    }

    /// The request never completed (connect failure, timeout)
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self {
            provider,
            status: None,
            message: message.into(),
        }
    }

    /// The response envelope was missing the expected completion field
    pub fn malformed(provider: &'static str, what: &str) -> Self {
        Self {
            provider,
            status: None,
            message: format!("malformed response: {}", what),
        }
    }

    /// Wrap a transport error from the HTTP client
    pub fn transport(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(provider, format!("request timed out: {}", err))
        } else if err.is_connect() {
            Self::network(provider, format!("connection failed: {}", err))
        } else {
            Self::network(provider, err.to_string())
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "{} backend error (HTTP {}): {}",
                self.provider, status, self.message
            ),
            None => write!(f, "{} backend error: {}", self.provider, self.message),
        }
    }
}

impl std::error::Error for BackendError {}

/// Invocation-level analysis error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// No template registered for the requested scenario
    TemplateNotFound(AnalysisScenario),

    /// The model tag does not name a known backend
    UnsupportedModel(String),

    /// An unknown scenario tag was supplied (configuration mistake)
    UnknownScenario(String),

    /// A backend call failed
    Backend(BackendError),

    /// The caller cancelled the analysis
    Cancelled,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateNotFound(scenario) => {
                write!(f, "no template registered for scenario: {}", scenario)
            }
            Self::UnsupportedModel(model) => write!(f, "unsupported model: {}", model),
            Self::UnknownScenario(tag) => write!(f, "unknown analysis scenario: {}", tag),
            Self::Backend(err) => write!(f, "{}", err),
            Self::Cancelled => write!(f, "analysis cancelled"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for AnalysisError {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}
