//! Sequential blog pipeline orchestrator.

use super::outcome::{PipelineOutcome, RunFailure, RunSummary};
use super::state::RunState;
use crate::cancellation::CancellationToken;
use crate::core::{FailurePoint, PipelineState, StageName, StageResult};
use crate::errors::{CompletionError, PipelineError};
use crate::events::{EventKind, EventSink, NoOpEventSink};
use crate::finalize::Finalizer;
use crate::llm::CompletionClient;
use crate::observability::{PipelineSpanAttributes, SpanTimer, StageSpanAttributes};
use crate::presentation::PresentationAdapter;
use crate::request::{GenerationRequest, ModelConfig};
use crate::stages::{
    execute_stage, DraftPrompt, EditPrompt, OutlinePrompt, ResearchPrompt, SeoPrompt, StagePrompt,
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs Research, Outline, Draft, Edit and SEO in order, then the finalizer.
///
/// Each stage is one provider call. Outputs flow forward only. The first
/// failure ends the run and the results gathered so far are returned with
/// it. Nothing is retried.
pub struct BlogPipeline {
    client: Arc<dyn CompletionClient>,
    events: Arc<dyn EventSink>,
    finalizer: Finalizer,
    call_timeout: Option<Duration>,
}

impl std::fmt::Debug for BlogPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogPipeline")
            .field("finalizer", &self.finalizer)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl BlogPipeline {
    /// Creates a pipeline over a completion client, with the local finalizer
    /// and no event sink.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            events: Arc::new(NoOpEventSink),
            finalizer: Finalizer::default(),
            call_timeout: None,
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Sets the finalizer.
    #[must_use]
    pub fn with_finalizer(mut self, finalizer: Finalizer) -> Self {
        self.finalizer = finalizer;
        self
    }

    /// Bounds each provider call. Expiry fails the current step with a
    /// provider error that has no status.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Runs the pipeline to completion.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        config: &ModelConfig,
        adapter: &dyn PresentationAdapter,
    ) -> PipelineOutcome {
        self.run_with_cancellation(request, config, adapter, &CancellationToken::new())
            .await
    }

    /// Runs the pipeline, stopping early if `token` is cancelled.
    ///
    /// The token is checked before each stage and raced against the
    /// in-flight provider call.
    pub async fn run_with_cancellation(
        &self,
        request: &GenerationRequest,
        config: &ModelConfig,
        adapter: &dyn PresentationAdapter,
        token: &CancellationToken,
    ) -> PipelineOutcome {
        let mut run = RunTracker::start();
        run.advance(PipelineState::Validating);

        if let Err(err) = request.validate().and_then(|()| config.validate()) {
            warn!(run_id = %run.id, error = %err, "Rejected generation request");
            return self
                .fail(run, FailurePoint::Validation, err.into(), adapter)
                .await;
        }

        let attrs = PipelineSpanAttributes::new()
            .with_run_id(run.id.to_string())
            .with_model_id(config.model_id.clone())
            .with_request(request.tone.to_string(), request.word_target, request.keywords.len());
        info!(
            run_id = %run.id,
            model = %config.model_id,
            tone = %request.tone,
            word_target = request.word_target,
            "Pipeline started"
        );
        self.emit(EventKind::PipelineStarted, attrs.to_json()).await;

        for stage in StageName::ALL {
            if token.is_cancelled() {
                run.advance(PipelineState::Running(stage));
                let err = cancelled(token);
                return self
                    .fail(run, FailurePoint::Stage(stage), err, adapter)
                    .await;
            }

            run.advance(PipelineState::Running(stage));
            let span = StageSpanAttributes::new(run.id.to_string(), stage.to_string(), stage.index() + 1);
            self.emit(EventKind::StageStarted, span.to_json()).await;

            let result = {
                let prompt = build_prompt(stage, request, &run.stages);
                self.guarded(execute_stage(prompt.as_ref(), self.client.as_ref(), config), token)
                    .await
            };

            match result {
                Ok(result) => {
                    let span = span
                        .with_status("completed")
                        .with_duration_ms(result.elapsed_ms())
                        .with_output_chars(result.content().chars().count());
                    self.emit(EventKind::StageCompleted, span.to_json()).await;
                    adapter.on_stage_complete(&result);
                    run.stages.push(result);
                }
                Err(err) => {
                    let span = span
                        .with_status("failed")
                        .with_error(err.kind(), err.to_string());
                    self.emit(EventKind::StageFailed, span.to_json()).await;
                    return self
                        .fail(run, FailurePoint::Stage(stage), err, adapter)
                        .await;
                }
            }
        }

        run.advance(PipelineState::Finalizing);
        self.emit(
            EventKind::PipelineFinalizing,
            serde_json::json!({
                "run_id": run.id.to_string(),
                "strategy": self.finalizer.strategy(),
            }),
        )
        .await;

        let finalized = {
            let edited = content_of(&run.stages, StageName::Edit);
            let seo = content_of(&run.stages, StageName::Seo);
            self.guarded(
                self.finalizer.run(edited, seo, self.client.as_ref(), config),
                token,
            )
            .await
        };

        match finalized {
            Ok(document) => self.succeed(run, document, adapter).await,
            Err(err) => self.fail(run, FailurePoint::Finalize, err, adapter).await,
        }
    }

    /// Applies the call timeout and races cancellation.
    async fn guarded<T, F>(&self, call: F, token: &CancellationToken) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, PipelineError>>,
    {
        let bounded = async {
            match self.call_timeout {
                Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                    Err(CompletionError::transport(format!(
                        "timed out after {:.1}s",
                        limit.as_secs_f64()
                    ))
                    .into())
                }),
                None => call.await,
            }
        };

        tokio::select! {
            result = bounded => result,
            () = token.cancelled() => Err(cancelled(token)),
        }
    }

    async fn succeed(
        &self,
        mut run: RunTracker,
        document: String,
        adapter: &dyn PresentationAdapter,
    ) -> PipelineOutcome {
        run.advance(PipelineState::Succeeded);
        let duration_ms = run.timer.elapsed_ms();
        info!(
            run_id = %run.id,
            duration_ms,
            chars = document.chars().count(),
            "Pipeline completed"
        );
        let attrs = PipelineSpanAttributes::new()
            .with_run_id(run.id.to_string())
            .with_outcome(PipelineState::Succeeded.to_string(), duration_ms);
        self.emit(EventKind::PipelineCompleted, attrs.to_json()).await;

        adapter.on_success(&document, &run.stages);
        let (stages, summary) = run.finish();
        PipelineOutcome::Succeeded {
            document,
            stages,
            run: summary,
        }
    }

    async fn fail(
        &self,
        mut run: RunTracker,
        point: FailurePoint,
        err: PipelineError,
        adapter: &dyn PresentationAdapter,
    ) -> PipelineOutcome {
        let state = PipelineState::Failed(point);
        run.advance(state);
        let duration_ms = run.timer.elapsed_ms();
        error!(
            run_id = %run.id,
            failed_at = %point,
            kind = err.kind(),
            error = %err,
            completed_stages = run.stages.len(),
            "Pipeline failed"
        );

        let mut payload = PipelineSpanAttributes::new()
            .with_run_id(run.id.to_string())
            .with_outcome(state.to_string(), duration_ms)
            .to_json();
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("failed_at".to_string(), serde_json::json!(point.name()));
            obj.insert("error".to_string(), serde_json::json!(err.to_dict()));
        }
        self.emit(EventKind::PipelineFailed, payload).await;

        adapter.on_failure(&point.name(), &err);
        let (stages, summary) = run.finish();
        PipelineOutcome::Failed {
            failure: RunFailure { point, error: err },
            stages,
            run: summary,
        }
    }

    async fn emit(&self, kind: EventKind, data: serde_json::Value) {
        self.events.emit(kind.as_str(), Some(data)).await;
    }
}

/// Per-run bookkeeping.
struct RunTracker {
    id: Uuid,
    started_at: chrono::DateTime<Utc>,
    timer: SpanTimer,
    state: RunState,
    stages: Vec<StageResult>,
}

impl RunTracker {
    fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            timer: SpanTimer::start("pipeline"),
            state: RunState::new(),
            stages: Vec::with_capacity(StageName::ALL.len()),
        }
    }

    fn advance(&mut self, next: PipelineState) {
        if let Err(err) = self.state.advance(next) {
            error!(run_id = %self.id, error = %err, "Rejected state transition");
        }
    }

    fn finish(self) -> (Vec<StageResult>, RunSummary) {
        let summary = RunSummary {
            run_id: self.id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            states: self.state.into_history(),
        };
        (self.stages, summary)
    }
}

fn cancelled(token: &CancellationToken) -> PipelineError {
    PipelineError::Cancelled {
        reason: token.reason().unwrap_or_else(|| "cancelled".to_string()),
    }
}

fn content_of(stages: &[StageResult], stage: StageName) -> &str {
    stages
        .iter()
        .find(|r| r.stage() == stage)
        .map_or("", StageResult::content)
}

/// Builds the prompt for `stage` from the request and the results so far.
/// An upstream result that is missing shows up as empty input.
fn build_prompt<'a>(
    stage: StageName,
    request: &'a GenerationRequest,
    stages: &'a [StageResult],
) -> Box<dyn StagePrompt + 'a> {
    let research = content_of(stages, StageName::Research);
    match stage {
        StageName::Research => Box::new(ResearchPrompt::new(request)),
        StageName::Outline => Box::new(OutlinePrompt::new(request, research)),
        StageName::Draft => Box::new(DraftPrompt::new(
            request,
            content_of(stages, StageName::Outline),
            research,
        )),
        StageName::Edit => Box::new(EditPrompt::new(request, content_of(stages, StageName::Draft))),
        StageName::Seo => Box::new(SeoPrompt::new(request, content_of(stages, StageName::Edit))),
    }
}
