//! LLM-backed security analysis engine for collected JavaScript sources.
//!
//! The crate takes a source document, an analysis scenario, and a model
//! choice, and produces one structured [`AnalysisResult`], splitting the
//! source into line-aligned chunks and merging per-chunk findings whenever
//! the text exceeds the chosen backend's context budget.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::analyzer::Analyzer;
pub use config::AnalysisSettings;
pub use domain::chunk::{CHUNK_FILL_FACTOR, ChunkPlan};
pub use domain::document::{SourceDocument, SourceMetadata};
pub use domain::error::{AnalysisError, BackendError};
pub use domain::model::{ModelChoice, ModelKind};
pub use domain::result::{AnalysisResult, AnalysisStatus, ScenarioPartial};
pub use domain::scenario::AnalysisScenario;
pub use infrastructure::prompts::{CODE_PLACEHOLDER, Template, TemplateRegistry};
pub use infrastructure::providers::{ModelBackend, backend_for};
pub use infrastructure::response_parser::ResponseParser;
