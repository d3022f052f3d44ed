//! Core domain model types for blogflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage names and pipeline states
//! - The immutable per-stage result

mod result;
mod status;

pub use result::StageResult;
pub use status::{FailurePoint, PipelineState, StageName};
