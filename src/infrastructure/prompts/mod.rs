//! Prompt templates and the scenario → template registry

mod builtin;

use std::collections::HashMap;

use crate::domain::scenario::AnalysisScenario;

/// Substitution placeholder the analyzed source text replaces. Every
/// occurrence is substituted, not just the first; some templates repeat
/// the code block.
pub const CODE_PLACEHOLDER: &str = "{{CODE}}";

/// A prompt template for one analysis scenario
#[derive(Debug, Clone)]
pub struct Template {
    pub scenario: AnalysisScenario,
    pub name: String,
    pub description: String,
    /// Prompt text containing the `{{CODE}}` placeholder
    pub prompt: String,
}

impl Template {
    pub fn new(
        scenario: AnalysisScenario,
        name: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            scenario,
            name: name.into(),
            description: description.into(),
            prompt: prompt.into(),
        }
    }

    /// Render the prompt, substituting every placeholder occurrence
    pub fn fill(&self, code: &str) -> String {
        self.prompt.replace(CODE_PLACEHOLDER, code)
    }
}

/// In-memory scenario → template catalog.
///
/// Registration is `&mut` and expected to happen at startup, before any
/// analysis runs; afterwards the registry is shared read-only (usually
/// behind an `Arc`), so concurrent reads need no locking.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<AnalysisScenario, Template>,
}

impl TemplateRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in template for every scenario
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for template in builtin::builtin_templates() {
            registry.register(template);
        }
        registry
    }

    /// Add a template. An existing entry for the same scenario is
    /// overwritten: last registered wins.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.scenario, template);
    }

    /// Look up the template for a scenario
    pub fn resolve(&self, scenario: AnalysisScenario) -> Option<&Template> {
        self.templates.get(&scenario)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
