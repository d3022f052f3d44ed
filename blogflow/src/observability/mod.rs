//! Span attributes and timing for pipeline runs.

mod tracing;

pub use tracing::{PipelineSpanAttributes, SpanTimer, StageSpanAttributes};
