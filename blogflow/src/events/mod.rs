//! Run lifecycle events.
//!
//! The orchestrator reports every state change to an [`EventSink`] as a typed
//! event name plus a JSON payload built from the span attributes in
//! [`crate::observability`].

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use std::fmt;

/// Lifecycle events emitted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Validation passed and the first stage is about to run.
    PipelineStarted,
    /// A stage is about to call the provider.
    StageStarted,
    /// A stage produced its result.
    StageCompleted,
    /// A stage failed and the run is halting.
    StageFailed,
    /// All stages succeeded and the finalizer is running.
    PipelineFinalizing,
    /// The final document is ready.
    PipelineCompleted,
    /// The run ended without a document.
    PipelineFailed,
}

impl EventKind {
    /// Returns the dotted event name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PipelineStarted => "pipeline.started",
            Self::StageStarted => "stage.started",
            Self::StageCompleted => "stage.completed",
            Self::StageFailed => "stage.failed",
            Self::PipelineFinalizing => "pipeline.finalizing",
            Self::PipelineCompleted => "pipeline.completed",
            Self::PipelineFailed => "pipeline.failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::PipelineStarted.as_str(), "pipeline.started");
        assert_eq!(EventKind::StageFailed.to_string(), "stage.failed");
        assert_eq!(EventKind::PipelineFinalizing.as_str(), "pipeline.finalizing");
    }
}
