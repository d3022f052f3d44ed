//! Result of one pipeline run.

use crate::core::{FailurePoint, PipelineState, StageResult};
use crate::errors::PipelineError;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

/// Identity and timing of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run reached its terminal state.
    pub finished_at: DateTime<Utc>,
    /// Every state the run visited, `Idle` first.
    pub states: Vec<PipelineState>,
}

impl RunSummary {
    /// Wall-clock duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Where and why a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFailure {
    /// Failure point.
    pub point: FailurePoint,
    /// Classified error.
    pub error: PipelineError,
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// All five stages and the finalizer succeeded.
    Succeeded {
        /// The final document.
        document: String,
        /// All five stage results, in order.
        stages: Vec<StageResult>,
        /// Run identity and timing.
        run: RunSummary,
    },
    /// The run halted.
    Failed {
        /// Failure point and error.
        failure: RunFailure,
        /// Results of the stages that completed before the failure.
        stages: Vec<StageResult>,
        /// Run identity and timing.
        run: RunSummary,
    },
}

impl PipelineOutcome {
    /// Returns true if the run produced a document.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Returns the final document, if any.
    #[must_use]
    pub fn document(&self) -> Option<&str> {
        match self {
            Self::Succeeded { document, .. } => Some(document),
            Self::Failed { .. } => None,
        }
    }

    /// Returns the completed stage results.
    #[must_use]
    pub fn stages(&self) -> &[StageResult] {
        match self {
            Self::Succeeded { stages, .. } | Self::Failed { stages, .. } => stages,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&RunFailure> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed { failure, .. } => Some(failure),
        }
    }

    /// Returns the run summary.
    #[must_use]
    pub fn run(&self) -> &RunSummary {
        match self {
            Self::Succeeded { run, .. } | Self::Failed { run, .. } => run,
        }
    }

    /// Returns the terminal state.
    #[must_use]
    pub fn final_state(&self) -> PipelineState {
        match self {
            Self::Succeeded { .. } => PipelineState::Succeeded,
            Self::Failed { failure, .. } => PipelineState::Failed(failure.point),
        }
    }

    /// Converts into the document or the error.
    ///
    /// # Errors
    ///
    /// Returns the run's [`PipelineError`] if it failed.
    pub fn into_result(self) -> Result<String, PipelineError> {
        match self {
            Self::Succeeded { document, .. } => Ok(document),
            Self::Failed { failure, .. } => Err(failure.error),
        }
    }

    /// Converts to a dictionary representation. The document itself is left
    /// out; only its length is reported.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let run = self.run();
        let mut map = HashMap::new();
        map.insert("run_id".to_string(), json!(run.run_id.to_string()));
        map.insert("started_at".to_string(), json!(run.started_at.to_rfc3339()));
        map.insert("finished_at".to_string(), json!(run.finished_at.to_rfc3339()));
        map.insert("state".to_string(), json!(self.final_state()));
        map.insert("states".to_string(), json!(run.states));
        map.insert(
            "stages".to_string(),
            json!(self.stages().iter().map(StageResult::to_dict).collect::<Vec<_>>()),
        );
        match self {
            Self::Succeeded { document, .. } => {
                map.insert("document_chars".to_string(), json!(document.len()));
            }
            Self::Failed { failure, .. } => {
                map.insert("failed_at".to_string(), json!(failure.point.name()));
                map.insert("error".to_string(), json!(failure.error.to_dict()));
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;

    fn summary() -> RunSummary {
        let now = Utc::now();
        RunSummary {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now + chrono::Duration::milliseconds(1500),
            states: vec![PipelineState::Idle, PipelineState::Validating],
        }
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = PipelineOutcome::Failed {
            failure: RunFailure {
                point: FailurePoint::Stage(StageName::Draft),
                error: PipelineError::EmptyResponse,
            },
            stages: vec![StageResult::new(StageName::Research, "r")],
            run: summary(),
        };

        assert!(!outcome.is_success());
        assert_eq!(outcome.document(), None);
        assert_eq!(outcome.stages().len(), 1);
        assert_eq!(
            outcome.final_state(),
            PipelineState::Failed(FailurePoint::Stage(StageName::Draft))
        );
        assert_eq!(outcome.run().duration_ms(), 1500);

        let dict = outcome.to_dict();
        assert_eq!(dict.get("failed_at").unwrap(), "Draft");
        assert_eq!(dict["error"]["type"], "EmptyResponseError");
        assert_eq!(dict["state"]["state"], "failed");

        assert_eq!(outcome.into_result(), Err(PipelineError::EmptyResponse));
    }

    #[test]
    fn test_succeeded_outcome() {
        let outcome = PipelineOutcome::Succeeded {
            document: "# Done\n".to_string(),
            stages: Vec::new(),
            run: summary(),
        };

        assert!(outcome.is_success());
        assert_eq!(outcome.document(), Some("# Done\n"));
        assert!(outcome.failure().is_none());
        assert_eq!(outcome.to_dict().get("document_chars").unwrap(), 7);
        assert_eq!(outcome.into_result(), Ok("# Done\n".to_string()));
    }
}
