//! Test helpers for blogflow pipelines.
//!
//! - [`ScriptedCompletionClient`]: a completion client with canned replies
//! - [`RecordingAdapter`]: records presentation callbacks
//! - fixtures for requests, configs and stage outputs
//! - assertions over stage results and final documents

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_every_prompt_contains, assert_failed_at, assert_headings_preserved,
    assert_single_toc_after_h1, assert_stage_order,
};
pub use fixtures::{
    sample_config, sample_request, sample_stage_outputs, stub_reply, TestRequest,
};
pub use mocks::{AdapterCall, RecordingAdapter, ScriptedCompletionClient};
