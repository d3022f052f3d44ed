//! Pipeline orchestration.
//!
//! This module provides:
//! - [`BlogPipeline`], the five-stage orchestrator
//! - [`RunState`], the forward-only state guard
//! - [`PipelineOutcome`], the terminal result of a run

mod orchestrator;
mod outcome;
mod state;


pub use orchestrator::BlogPipeline;
pub use outcome::{PipelineOutcome, RunFailure, RunSummary};
pub use state::RunState;
