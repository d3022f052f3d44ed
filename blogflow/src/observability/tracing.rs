//! Structured span attributes for blogflow runs.
//!
//! These feed both the `tracing` events the orchestrator logs and the payloads
//! it hands to the event sink.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Span attributes for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpanAttributes {
    /// Run identifier.
    pub run_id: Option<String>,
    /// Model identifier.
    pub model_id: Option<String>,
    /// Tone requested.
    pub tone: Option<String>,
    /// Word target requested.
    pub word_target: Option<u32>,
    /// Number of target keywords.
    pub keyword_count: Option<usize>,
    /// Terminal state, once known.
    pub outcome: Option<String>,
    /// Total duration in milliseconds.
    pub duration_ms: Option<f64>,
}

impl PipelineSpanAttributes {
    /// Creates empty pipeline span attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the run ID.
    #[must_use]
    pub fn with_run_id(mut self, id: impl Into<String>) -> Self {
        self.run_id = Some(id.into());
        self
    }

    /// Sets the model ID.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Sets the request shape: tone, word target and keyword count.
    #[must_use]
    pub fn with_request(mut self, tone: impl Into<String>, word_target: u32, keyword_count: usize) -> Self {
        self.tone = Some(tone.into());
        self.word_target = Some(word_target);
        self.keyword_count = Some(keyword_count);
        self
    }

    /// Sets the outcome and total duration.
    #[must_use]
    pub fn with_outcome(mut self, outcome: impl Into<String>, duration_ms: f64) -> Self {
        self.outcome = Some(outcome.into());
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Converts to an event payload.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Span attributes for one stage call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSpanAttributes {
    /// Run identifier.
    pub run_id: String,
    /// Stage name.
    pub stage_name: String,
    /// Position in the sequence, starting at 1.
    pub position: usize,
    /// Stage status.
    pub status: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: Option<f64>,
    /// Output length in characters.
    pub output_chars: Option<usize>,
    /// Error kind if failed.
    pub error_kind: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl StageSpanAttributes {
    /// Creates stage span attributes.
    #[must_use]
    pub fn new(run_id: impl Into<String>, stage_name: impl Into<String>, position: usize) -> Self {
        Self {
            run_id: run_id.into(),
            stage_name: stage_name.into(),
            position,
            ..Default::default()
        }
    }

    /// Sets the stage status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Sets the output length.
    #[must_use]
    pub fn with_output_chars(mut self, chars: usize) -> Self {
        self.output_chars = Some(chars);
        self
    }

    /// Sets the error.
    #[must_use]
    pub fn with_error(mut self, kind: impl Into<String>, error: impl Into<String>) -> Self {
        self.error_kind = Some(kind.into());
        self.error = Some(error.into());
        self
    }

    /// Converts to an event payload.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}
