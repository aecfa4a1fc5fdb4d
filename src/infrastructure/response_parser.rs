//! Extraction of structured findings from free-form model output
//!
//! Models are instructed to answer with a fenced JSON block, but the
//! instruction is not always honored. Parsing therefore tries, in order: a
//! ```json fenced block, the whole response as JSON, and finally wrapping
//! the raw text verbatim as opaque custom findings. The last step cannot
//! fail, so parsing never errors.

use serde_json::{Value, json};
use tracing::debug;

use crate::domain::result::{ScenarioPartial, field};
use crate::domain::scenario::AnalysisScenario;

/// Utilities for turning raw model output into a [`ScenarioPartial`]
pub struct ResponseParser;

impl ResponseParser {
    /// Parse one unit's raw output. Never fails; unparseable output comes
    /// back as `custom_findings.rawResponse`.
    pub fn parse(raw: &str, scenario: AnalysisScenario) -> ScenarioPartial {
        let trimmed = raw.trim();

        if let Some(block) = Self::extract_fenced_json(trimmed)
            && let Ok(value) = serde_json::from_str::<Value>(&block)
        {
            return Self::map_to_fields(value, scenario);
        }

        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return Self::map_to_fields(value, scenario);
        }

        debug!(scenario = %scenario, "response carried no decodable JSON, keeping raw text");
        ScenarioPartial::new().with_field(
            field::CUSTOM_FINDINGS,
            json!({ "rawResponse": raw }),
        )
    }

    /// Extract the contents of the first ```json fenced block.
    pub fn extract_fenced_json(content: &str) -> Option<String> {
        let fence = "```";
        let mut search = content;

        loop {
            let start = search.find(fence)?;
            let after_start = &search[start + fence.len()..];

            let (lang_tag, rest) = match after_start.find('\n') {
                Some(line_end) => (after_start[..line_end].trim(), &after_start[line_end + 1..]),
                None => return None,
            };

            if !lang_tag.eq_ignore_ascii_case("json") {
                search = after_start;
                continue;
            }

            let end = rest.find(fence)?;
            return Some(rest[..end].trim().to_string());
        }
    }

    /// Project decoded JSON into result fields for the scenario.
    ///
    /// Expected keys that are absent project to empty lists; scenarios
    /// without a static projection pass the whole object through as custom
    /// findings.
    pub fn map_to_fields(value: Value, scenario: AnalysisScenario) -> ScenarioPartial {
        let mut partial = ScenarioPartial::new();

        match scenario {
            AnalysisScenario::ApiDiscovery => {
                partial.insert(field::API_ENDPOINTS, take_list(&value, "endpoints"));
            }
            AnalysisScenario::SecretScan => {
                partial.insert(field::SECRETS, take_list(&value, "findings"));
            }
            AnalysisScenario::VulnerabilityScan => {
                partial.insert(field::VULNERABILITIES, take_list(&value, "vulnerabilities"));
            }
            AnalysisScenario::HiddenFeatures => {
                let mut features: Vec<Value> = Vec::new();
                collect_strings(&value, "hiddenRoutes", "path", &mut features);
                collect_strings(&value, "debugEndpoints", "endpoint", &mut features);
                partial.insert(field::HIDDEN_FEATURES, Value::Array(features));
            }
            _ => {
                partial.insert(field::CUSTOM_FINDINGS, value);
            }
        }

        partial
    }
}

fn take_list(value: &Value, key: &str) -> Value {
    match value.get(key) {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        _ => Value::Array(Vec::new()),
    }
}

fn collect_strings(value: &Value, list_key: &str, item_key: &str, out: &mut Vec<Value>) {
    if let Some(Value::Array(items)) = value.get(list_key) {
        for item in items {
            if let Some(Value::String(s)) = item.get(item_key) {
                out.push(Value::String(s.clone()));
            }
        }
    }
}
