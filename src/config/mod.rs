//! Engine configuration
//!
//! Everything here is plain input data: the engine never reads this (or any
//! other global state) on its own. Callers load a config, build a
//! [`ModelChoice`] from it, and pass that into each analysis call.

use serde::{Deserialize, Serialize};

use crate::domain::model::{ModelChoice, ModelKind};
use crate::domain::scenario::AnalysisScenario;

/// Top-level configuration for embedders of the engine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub providers: ProvidersConfig,
    pub analysis: AnalysisSettings,
}

/// Credentials and endpoints per provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    pub gemini: ProviderCredentials,
    pub deepseek: ProviderCredentials,
    pub openai: ProviderCredentials,
    pub custom: CustomProviderConfig,
}

/// Credential block for a hosted provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderCredentials {
    /// API key; the conventional environment variable is the fallback
    pub api_key: Option<String>,
}

/// A user-supplied OpenAI-compatible endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CustomProviderConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Context budget of the custom model, in characters
    pub context_limit: Option<usize>,
}

/// Tunables of the analysis orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// How many chunk calls may be in flight at once
    pub max_concurrent_chunks: usize,
    /// Model tag used when the caller does not pick one
    pub default_model: String,
    /// Scenarios run by `analyze_all` when the caller does not pick any
    pub default_scenarios: Vec<AnalysisScenario>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_concurrent_chunks: 3,
            default_model: "gemini-2.5-flash".to_string(),
            default_scenarios: vec![
                AnalysisScenario::ApiDiscovery,
                AnalysisScenario::SecretScan,
                AnalysisScenario::VulnerabilityScan,
            ],
        }
    }
}

impl ProvidersConfig {
    /// Assemble the model choice for a model tag, falling back to the
    /// conventional environment variables for missing keys.
    pub fn model_choice(&self, kind: ModelKind) -> ModelChoice {
        match kind {
            ModelKind::GeminiFlash => ModelChoice {
                api_key: key_or_env(&self.gemini.api_key, "GEMINI_API_KEY"),
                ..ModelChoice::new(kind)
            },
            ModelKind::DeepSeekV3 => ModelChoice {
                api_key: key_or_env(&self.deepseek.api_key, "DEEPSEEK_API_KEY"),
                ..ModelChoice::new(kind)
            },
            ModelKind::Gpt41Mini => ModelChoice {
                api_key: key_or_env(&self.openai.api_key, "OPENAI_API_KEY"),
                ..ModelChoice::new(kind)
            },
            ModelKind::Custom => ModelChoice {
                api_key: self.custom.api_key.clone(),
                endpoint: self.custom.endpoint.clone(),
                context_limit_override: self.custom.context_limit,
                ..ModelChoice::new(kind)
            },
            // dispatch reports the unsupported tag
            ModelKind::Unrecognized(_) => ModelChoice::new(kind),
        }
    }
}

fn key_or_env(configured: &Option<String>, var: &str) -> Option<String> {
    configured
        .clone()
        .or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

impl EngineConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Sources, later ones winning: `config/default`, `config/$ENV` when
    /// `ENV` is set, `config/local`, then `JSHUNTER__`-separated environment
    /// variables.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("JSHUNTER").separator("__"));

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("configuration file error: {0}")]
    Config(#[from] config::ConfigError),
}
