//! Analysis results and structured findings
//!
//! Mirrors the shapes the prompt templates instruct the model to emit.
//! Everything is deserialized leniently: unknown fields are ignored, known
//! fields default when absent, and a malformed element in a findings list is
//! skipped rather than failing the whole result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::domain::scenario::AnalysisScenario;

/// Result field names shared by the response parser and the merger
pub mod field {
    pub const API_ENDPOINTS: &str = "api_endpoints";
    pub const SECRETS: &str = "secrets";
    pub const VULNERABILITIES: &str = "vulnerabilities";
    pub const HIDDEN_FEATURES: &str = "hidden_features";
    pub const CUSTOM_FINDINGS: &str = "custom_findings";
}

/// Outcome of one analysis invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Every unit (whole text or chunk) was analyzed
    Success,
    /// Some chunks failed or were cancelled; merged fields cover the rest
    Partial,
    /// Nothing was analyzed
    Error,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a finding sits in the analyzed source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FindingLocation {
    pub line: Option<u64>,
    pub column: Option<u64>,
    pub snippet: String,
}

/// Category of a discovered secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum SecretKind {
    ApiKey,
    Token,
    Password,
    ConnectionString,
    Domain,
    Ip,
    #[default]
    Other,
}

impl From<String> for SecretKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "api-key" => Self::ApiKey,
            "token" => Self::Token,
            "password" => Self::Password,
            "connection-string" => Self::ConnectionString,
            "domain" => Self::Domain,
            "ip" => Self::Ip,
            _ => Self::Other,
        }
    }
}

/// Risk rating attached to a secret finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl From<String> for RiskLevel {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }
}

/// A hardcoded credential or other sensitive value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretFinding {
    #[serde(rename = "type")]
    pub kind: SecretKind,
    pub value: String,
    pub risk_level: RiskLevel,
    pub location: Option<FindingLocation>,
    pub description: String,
    pub exploitation: Option<String>,
    pub remediation: Option<String>,
}

/// Category of a vulnerability finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum VulnerabilityKind {
    Xss,
    Injection,
    PrototypePollution,
    Csrf,
    WeakCrypto,
    ClientValidation,
    #[default]
    Other,
}

impl From<String> for VulnerabilityKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "xss" => Self::Xss,
            "injection" => Self::Injection,
            "prototype-pollution" => Self::PrototypePollution,
            "csrf" => Self::Csrf,
            "weak-crypto" => Self::WeakCrypto,
            "client-validation" => Self::ClientValidation,
            _ => Self::Other,
        }
    }
}

/// Severity rating for a vulnerability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Info,
}

impl From<String> for Severity {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Info,
        }
    }
}

/// A detected vulnerability pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct VulnerabilityFinding {
    #[serde(rename = "type")]
    pub kind: VulnerabilityKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub location: Option<FindingLocation>,
    pub exploitation: Option<String>,
    pub cwe: Option<String>,
    pub cvss: Option<f64>,
    pub remediation: Option<String>,
}

/// A discovered API endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub method: String,
    pub path: String,
    pub full_url: Option<String>,
    pub params: Option<Value>,
    pub headers: Option<Value>,
    pub auth_type: Option<String>,
    pub location: Option<FindingLocation>,
}

/// The structured (or opaque) output of analyzing one unit of source text,
/// prior to merging. Keys are result field names; values keep the decoded
/// JSON shape so the merger can reason about lists vs objects without
/// knowing scenario semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioPartial {
    pub fields: Map<String, Value>,
}

impl ScenarioPartial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The record produced by one (source, scenario, model) analysis invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub source_id: String,
    pub scenario: AnalysisScenario,
    /// Model tag the analysis ran against
    pub model: String,
    /// The rendered prompt, or a marker for chunked runs
    pub prompt: String,
    /// The raw model output; chunked runs carry a marker plus the per-chunk
    /// outputs in plan order, for audit
    pub raw_response: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub status: AnalysisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_endpoints: Vec<ApiEndpoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<SecretFinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vulnerabilities: Vec<VulnerabilityFinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_findings: Option<Value>,
}

impl AnalysisResult {
    /// Move merged fields into their typed slots.
    ///
    /// Element-lenient: a list element that does not decode is dropped with
    /// a warning instead of poisoning the result.
    pub(crate) fn populate(&mut self, mut partial: ScenarioPartial) {
        if let Some(value) = partial.fields.remove(field::API_ENDPOINTS) {
            self.api_endpoints = decode_list(value, field::API_ENDPOINTS);
        }
        if let Some(value) = partial.fields.remove(field::SECRETS) {
            self.secrets = decode_list(value, field::SECRETS);
        }
        if let Some(value) = partial.fields.remove(field::VULNERABILITIES) {
            self.vulnerabilities = decode_list(value, field::VULNERABILITIES);
        }
        if let Some(value) = partial.fields.remove(field::HIDDEN_FEATURES) {
            self.hidden_features = decode_list(value, field::HIDDEN_FEATURES);
        }
        if let Some(value) = partial.fields.remove(field::CUSTOM_FINDINGS) {
            self.custom_findings = Some(value);
        }
        for key in partial.fields.keys() {
            warn!(field = %key, "dropping unrecognized merged field");
        }
    }
}

fn decode_list<T: serde::de::DeserializeOwned>(value: Value, name: &str) -> Vec<T> {
    let Value::Array(items) = value else {
        warn!(field = name, "expected a list, got a different shape");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(field = name, error = %err, "skipping malformed finding");
                None
            }
        })
        .collect()
}
