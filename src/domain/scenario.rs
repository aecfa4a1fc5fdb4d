//! Analysis scenario tags
//!
//! Each scenario names one analysis objective and maps to exactly one prompt
//! template in the registry. Tag strings are a wire contract shared with the
//! collectors and the stored results; matching is exact and case-sensitive.

use serde::{Deserialize, Serialize};

use crate::domain::error::AnalysisError;

/// A named analysis objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisScenario {
    /// Extract API endpoints, methods, parameters, and auth headers
    ApiDiscovery,
    /// Hardcoded keys, tokens, credentials, connection strings
    SecretScan,
    /// Authentication and authorization logic, bypass candidates
    AuthAnalysis,
    /// Cryptographic algorithms, key management, weak primitives
    CryptoDetection,
    /// Common vulnerability patterns (XSS, injection, prototype pollution)
    VulnerabilityScan,
    /// Business flows and client-side validation weaknesses
    BusinessLogic,
    /// Hidden routes, debug endpoints, feature flags
    HiddenFeatures,
    /// WebSocket connections, message formats, protocol security
    WebsocketAnalysis,
    /// GraphQL operations, schema exposure, introspection
    GraphqlAnalysis,
    /// Anti-debugging and anti-analysis protections
    AntiDebugAnalysis,
    /// SPA route tables, guards, unlisted paths
    RouteAnalysis,
    /// Sensitive data sources, sinks, and leakage paths
    DataFlowAnalysis,
    /// Catch-all comprehensive analysis
    Custom,
}

impl AnalysisScenario {
    /// All known scenarios, in catalog order
    pub const ALL: [AnalysisScenario; 13] = [
        Self::ApiDiscovery,
        Self::SecretScan,
        Self::AuthAnalysis,
        Self::CryptoDetection,
        Self::VulnerabilityScan,
        Self::BusinessLogic,
        Self::HiddenFeatures,
        Self::WebsocketAnalysis,
        Self::GraphqlAnalysis,
        Self::AntiDebugAnalysis,
        Self::RouteAnalysis,
        Self::DataFlowAnalysis,
        Self::Custom,
    ];

    /// The scenario's tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiDiscovery => "api-discovery",
            Self::SecretScan => "secret-scan",
            Self::AuthAnalysis => "auth-analysis",
            Self::CryptoDetection => "crypto-detection",
            Self::VulnerabilityScan => "vulnerability-scan",
            Self::BusinessLogic => "business-logic",
            Self::HiddenFeatures => "hidden-features",
            Self::WebsocketAnalysis => "websocket-analysis",
            Self::GraphqlAnalysis => "graphql-analysis",
            Self::AntiDebugAnalysis => "anti-debug-analysis",
            Self::RouteAnalysis => "route-analysis",
            Self::DataFlowAnalysis => "data-flow-analysis",
            Self::Custom => "custom",
        }
    }

    /// Parse a tag string. Exact, case-sensitive match; unknown tags fail.
    pub fn parse(tag: &str) -> Result<Self, AnalysisError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == tag)
            .ok_or_else(|| AnalysisError::UnknownScenario(tag.to_string()))
    }
}

impl std::fmt::Display for AnalysisScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
