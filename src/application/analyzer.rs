//! The analysis orchestrator
//!
//! For one (source, scenario, model) triple this decides between the
//! single-shot and chunked paths, drives the backend calls, and assembles
//! the final timed result record. Every failure mode (missing template,
//! unsupported model, backend errors, cancellation) comes back as status
//! and message data on the result; `analyze` itself never fails.
//!
//! Chunks are processed concurrently up to a configured width, but the
//! merge always follows chunk-plan order, never completion order. The
//! orchestrator performs no retries, no backoff, and no queueing; those are
//! caller concerns.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::merge::merge_partials;
use crate::config::AnalysisSettings;
use crate::domain::chunk::ChunkPlan;
use crate::domain::document::SourceDocument;
use crate::domain::error::{AnalysisError, BackendError};
use crate::domain::model::ModelChoice;
use crate::domain::result::{AnalysisResult, AnalysisStatus, ScenarioPartial};
use crate::domain::scenario::AnalysisScenario;
use crate::infrastructure::prompts::{Template, TemplateRegistry};
use crate::infrastructure::providers::{ModelBackend, backend_for};
use crate::infrastructure::response_parser::ResponseParser;

/// The analysis dispatch engine
pub struct Analyzer {
    registry: Arc<TemplateRegistry>,
    settings: AnalysisSettings,
}

/// Per-chunk outcome, keyed back to its plan index before merging
enum ChunkOutcome {
    Done { raw: String, partial: ScenarioPartial },
    Failed(BackendError),
    Cancelled,
}

impl Analyzer {
    pub fn new(registry: Arc<TemplateRegistry>, settings: AnalysisSettings) -> Self {
        Self { registry, settings }
    }

    /// An analyzer over the built-in template catalog
    pub fn with_builtin_templates(settings: AnalysisSettings) -> Self {
        Self::new(Arc::new(TemplateRegistry::builtin()), settings)
    }

    /// Analyze one source under one scenario with one model choice
    pub async fn analyze(
        &self,
        source: &SourceDocument,
        scenario: AnalysisScenario,
        choice: &ModelChoice,
    ) -> AnalysisResult {
        self.analyze_with_cancellation(source, scenario, choice, CancellationToken::new())
            .await
    }

    /// Like [`Self::analyze`], but abortable.
    ///
    /// On cancellation, chunk partials that already completed are merged and
    /// returned with status `partial`; cancellation before any chunk
    /// completes yields status `error`.
    pub async fn analyze_with_cancellation(
        &self,
        source: &SourceDocument,
        scenario: AnalysisScenario,
        choice: &ModelChoice,
        cancel: CancellationToken,
    ) -> AnalysisResult {
        let ctx = RunContext::start(source, scenario, choice.kind.as_str());

        let backend = match backend_for(choice) {
            Ok(backend) => backend,
            Err(err) => return ctx.error_result(err.to_string()),
        };

        self.run(ctx, backend, choice.context_limit(), cancel).await
    }

    /// Run against an already-constructed backend.
    ///
    /// This is the seam embedders (and tests) use to supply their own
    /// [`ModelBackend`] implementation; `analyze` resolves the backend from
    /// the model choice and delegates here.
    pub async fn analyze_with_backend(
        &self,
        source: &SourceDocument,
        scenario: AnalysisScenario,
        model: &str,
        backend: Arc<dyn ModelBackend>,
        context_limit: usize,
        cancel: CancellationToken,
    ) -> AnalysisResult {
        let ctx = RunContext::start(source, scenario, model);
        self.run(ctx, backend, context_limit, cancel).await
    }

    /// Run every scenario against the same source, isolating failures per
    /// scenario: one scenario's error result never stops the others.
    pub async fn analyze_all(
        &self,
        source: &SourceDocument,
        scenarios: &[AnalysisScenario],
        choice: &ModelChoice,
    ) -> Vec<AnalysisResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.analyze(source, *scenario, choice).await);
        }
        results
    }

    async fn run(
        &self,
        ctx: RunContext<'_>,
        backend: Arc<dyn ModelBackend>,
        context_limit: usize,
        cancel: CancellationToken,
    ) -> AnalysisResult {
        let template = match self.registry.resolve(ctx.scenario) {
            Some(template) => template.clone(),
            None => {
                let message = AnalysisError::TemplateNotFound(ctx.scenario).to_string();
                return ctx.error_result(message);
            }
        };

        info!(
            source = %ctx.source.id,
            scenario = %ctx.scenario,
            model = %ctx.model,
            size = ctx.source.size,
            "starting analysis"
        );

        if ctx.source.text.len() <= context_limit {
            let prompt = template.fill(&ctx.source.text);
            return self.run_single_shot(ctx, backend, prompt, cancel).await;
        }

        let plan = ChunkPlan::plan(&ctx.source.text, context_limit);
        self.run_chunked(ctx, backend, &template, plan, cancel).await
    }

    async fn run_single_shot(
        &self,
        ctx: RunContext<'_>,
        backend: Arc<dyn ModelBackend>,
        prompt: String,
        cancel: CancellationToken,
    ) -> AnalysisResult {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                return ctx.error_result(AnalysisError::Cancelled.to_string());
            }
            outcome = backend.send(&prompt) => outcome,
        };

        match outcome {
            Ok(raw) => {
                let partial = ResponseParser::parse(&raw, ctx.scenario);
                ctx.success_result(prompt, raw, partial)
            }
            Err(err) => {
                warn!(source = %ctx.source.id, error = %err, "backend call failed");
                ctx.error_result(err.to_string())
            }
        }
    }

    async fn run_chunked(
        &self,
        ctx: RunContext<'_>,
        backend: Arc<dyn ModelBackend>,
        template: &Template,
        plan: ChunkPlan,
        cancel: CancellationToken,
    ) -> AnalysisResult {
        let chunk_count = plan.len();
        info!(
            source = %ctx.source.id,
            scenario = %ctx.scenario,
            chunks = chunk_count,
            "source exceeds context budget, running chunked"
        );

        let jobs = plan.chunks().iter().enumerate().map(|(index, chunk)| {
            let prompt = template.fill(chunk);
            let backend = backend.clone();
            let cancel = cancel.clone();
            let scenario = ctx.scenario;

            async move {
                let outcome = tokio::select! {
                    _ = cancel.cancelled() => ChunkOutcome::Cancelled,
                    sent = backend.send(&prompt) => match sent {
                        Ok(raw) => {
                            let partial = ResponseParser::parse(&raw, scenario);
                            ChunkOutcome::Done { raw, partial }
                        }
                        Err(err) => ChunkOutcome::Failed(err),
                    },
                };
                (index, outcome)
            }
        });

        let mut outcomes: Vec<(usize, ChunkOutcome)> = stream::iter(jobs)
            .buffer_unordered(self.settings.max_concurrent_chunks.max(1))
            .collect()
            .await;

        // merge order is plan order, never completion order
        outcomes.sort_by_key(|(index, _)| *index);

        let mut partials = Vec::new();
        let mut failures = Vec::new();
        let mut cancelled = 0usize;
        let mut raw_sections = String::new();

        for (index, outcome) in outcomes {
            match outcome {
                ChunkOutcome::Done { raw, partial } => {
                    raw_sections.push_str(&format!("\n\n--- chunk {} ---\n{}", index, raw));
                    partials.push(partial);
                }
                ChunkOutcome::Failed(err) => {
                    warn!(
                        source = %ctx.source.id,
                        chunk = index,
                        error = %err,
                        "chunk analysis failed"
                    );
                    raw_sections
                        .push_str(&format!("\n\n--- chunk {} ---\n<failed: {}>", index, err));
                    failures.push(format!("chunk {}: {}", index, err));
                }
                ChunkOutcome::Cancelled => {
                    debug!(source = %ctx.source.id, chunk = index, "chunk cancelled");
                    raw_sections.push_str(&format!("\n\n--- chunk {} ---\n<cancelled>", index));
                    cancelled += 1;
                }
            }
        }

        let status = if partials.len() == chunk_count {
            AnalysisStatus::Success
        } else if partials.is_empty() {
            AnalysisStatus::Error
        } else {
            AnalysisStatus::Partial
        };

        let mut error_lines = failures;
        if cancelled > 0 {
            error_lines.push(format!("{} of {} chunks cancelled", cancelled, chunk_count));
        }
        let error = if error_lines.is_empty() {
            None
        } else {
            Some(error_lines.join("; "))
        };

        let merged = merge_partials(&partials);
        let prompt = format!("[chunked analysis: {} chunks]", chunk_count);
        let raw_response = format!("[chunked analysis: {} chunks]{}", chunk_count, raw_sections);

        info!(
            source = %ctx.source.id,
            scenario = %ctx.scenario,
            status = %status,
            chunks_succeeded = partials.len(),
            chunks_total = chunk_count,
            "chunked analysis complete"
        );

        ctx.finish(status, prompt, raw_response, error, merged)
    }
}

/// Timing and identity shared by every result a run can produce
struct RunContext<'a> {
    source: &'a SourceDocument,
    scenario: AnalysisScenario,
    model: String,
    started_at: DateTime<Utc>,
    clock: Instant,
}

impl<'a> RunContext<'a> {
    fn start(source: &'a SourceDocument, scenario: AnalysisScenario, model: &str) -> Self {
        Self {
            source,
            scenario,
            model: model.to_string(),
            started_at: Utc::now(),
            clock: Instant::now(),
        }
    }

    fn finish(
        self,
        status: AnalysisStatus,
        prompt: String,
        raw_response: String,
        error: Option<String>,
        partial: ScenarioPartial,
    ) -> AnalysisResult {
        let mut result = AnalysisResult {
            id: Uuid::new_v4(),
            source_id: self.source.id.clone(),
            scenario: self.scenario,
            model: self.model,
            prompt,
            raw_response,
            started_at: self.started_at,
            duration_ms: self.clock.elapsed().as_millis() as u64,
            status,
            error,
            api_endpoints: Vec::new(),
            secrets: Vec::new(),
            vulnerabilities: Vec::new(),
            hidden_features: Vec::new(),
            custom_findings: None,
        };
        result.populate(partial);
        result
    }

    fn success_result(self, prompt: String, raw: String, partial: ScenarioPartial) -> AnalysisResult {
        self.finish(AnalysisStatus::Success, prompt, raw, None, partial)
    }

    fn error_result(self, message: String) -> AnalysisResult {
        self.finish(
            AnalysisStatus::Error,
            String::new(),
            String::new(),
            Some(message),
            ScenarioPartial::new(),
        )
    }
}
