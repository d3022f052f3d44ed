//! Presentation boundary.
//!
//! The orchestrator reports progress through a [`PresentationAdapter`] and
//! knows nothing about how it is shown. Front ends implement the trait; the
//! console adapter lives in the CLI crate.

mod export;

pub use export::{export_document, export_file_name, DEFAULT_EXPORT_NAME};

use crate::core::StageResult;
use crate::errors::PipelineError;

/// Receives run progress from the orchestrator.
///
/// Calls arrive in run order: `on_stage_complete` once per successful stage,
/// then exactly one of `on_failure` or `on_success`.
pub trait PresentationAdapter: Send + Sync {
    /// A stage finished successfully.
    fn on_stage_complete(&self, result: &StageResult);

    /// The run halted. `stage_name` is the stage's display name, or
    /// `validation` / `finalize` for the non-stage failure points.
    fn on_failure(&self, stage_name: &str, error: &PipelineError);

    /// The run produced its final document.
    fn on_success(&self, document: &str, stages: &[StageResult]);
}

/// Adapter that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAdapter;

impl PresentationAdapter for NoOpAdapter {
    fn on_stage_complete(&self, _result: &StageResult) {}

    fn on_failure(&self, _stage_name: &str, _error: &PipelineError) {}

    fn on_success(&self, _document: &str, _stages: &[StageResult]) {}
}
