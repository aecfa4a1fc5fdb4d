//! Domain layer - entities, value objects, and errors of the analysis engine

pub mod chunk;
pub mod document;
pub mod error;
pub mod model;
pub mod result;
pub mod scenario;

pub use chunk::{CHUNK_FILL_FACTOR, ChunkPlan};
pub use document::{BundlerGuess, FrameworkGuess, SourceDocument, SourceMetadata};
pub use error::{AnalysisError, BackendError};
pub use model::{ModelChoice, ModelKind};
pub use result::{
    AnalysisResult, AnalysisStatus, ApiEndpoint, FindingLocation, RiskLevel, ScenarioPartial,
    SecretFinding, SecretKind, Severity, VulnerabilityFinding, VulnerabilityKind,
};
pub use scenario::AnalysisScenario;
