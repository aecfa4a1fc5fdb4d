//! Model selection
//!
//! A [`ModelChoice`] carries everything one backend call needs: which
//! provider to talk to, the credential, an optional custom endpoint, and an
//! optional context-size override. There is no ambient configuration lookup
//! anywhere below this type; the orchestrator receives a choice per call.

use serde::{Deserialize, Serialize};

/// Known model backends, plus an explicit terminal case for tags the
/// engine does not recognize. Dispatch over this enum is exhaustive;
/// `Unrecognized` fails with `AnalysisError::UnsupportedModel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelKind {
    GeminiFlash,
    DeepSeekV3,
    Gpt41Mini,
    Custom,
    Unrecognized(String),
}

impl ModelKind {
    /// Parse a model tag. Exact match; unknown tags are preserved so the
    /// dispatch site can report them.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "gemini-2.5-flash" => Self::GeminiFlash,
            "deepseek-v3" => Self::DeepSeekV3,
            "gpt-4.1-mini" => Self::Gpt41Mini,
            "custom" => Self::Custom,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// The model tag string
    pub fn as_str(&self) -> &str {
        match self {
            Self::GeminiFlash => "gemini-2.5-flash",
            Self::DeepSeekV3 => "deepseek-v3",
            Self::Gpt41Mini => "gpt-4.1-mini",
            Self::Custom => "custom",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Maximum input size in characters for one call to this backend.
    ///
    /// Static per provider; custom and unrecognized providers get a
    /// conservative default.
    pub fn default_context_limit(&self) -> usize {
        match self {
            Self::GeminiFlash => 2_000_000,
            Self::DeepSeekV3 => 128_000,
            Self::Gpt41Mini => 1_000_000,
            Self::Custom | Self::Unrecognized(_) => 128_000,
        }
    }
}

impl From<String> for ModelKind {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<ModelKind> for String {
    fn from(kind: ModelKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything one analysis call needs to know about its backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    /// Which backend to dispatch to
    pub kind: ModelKind,
    /// Credential for the provider, if one is configured
    pub api_key: Option<String>,
    /// Endpoint URL for the custom provider
    pub endpoint: Option<String>,
    /// Overrides the per-provider context limit when set
    pub context_limit_override: Option<usize>,
}

impl ModelChoice {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            api_key: None,
            endpoint: None,
            context_limit_override: None,
        }
    }

    /// Gemini 2.5 Flash via Google AI Studio
    pub fn gemini_flash(api_key: impl Into<String>) -> Self {
        Self::new(ModelKind::GeminiFlash).with_api_key(api_key)
    }

    /// DeepSeek V3 chat API
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new(ModelKind::DeepSeekV3).with_api_key(api_key)
    }

    /// GPT-4.1 mini via the OpenAI API
    pub fn gpt_41_mini(api_key: impl Into<String>) -> Self {
        Self::new(ModelKind::Gpt41Mini).with_api_key(api_key)
    }

    /// A user-supplied OpenAI-compatible endpoint; the key is optional
    pub fn custom(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            kind: ModelKind::Custom,
            api_key,
            endpoint: Some(endpoint.into()),
            context_limit_override: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit_override = Some(limit);
        self
    }

    /// The context budget for this choice, in characters
    pub fn context_limit(&self) -> usize {
        self.context_limit_override
            .unwrap_or_else(|| self.kind.default_context_limit())
    }
}
