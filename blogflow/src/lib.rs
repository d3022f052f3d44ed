//! # Blogflow
//!
//! A sequential LLM pipeline that turns a topic brief into a publish-ready,
//! SEO-annotated markdown blog post.
//!
//! A run passes through five content stages, each a single provider call:
//!
//! - **Research**: facts, statistics and source names for the topic
//! - **Outline**: a heading hierarchy with per-section word budgets
//! - **Draft**: the full markdown article
//! - **Edit**: a tightened draft with the same structure
//! - **SEO**: title, description, slug, keywords and FAQ pairs
//!
//! The finalizer then merges the edited draft and the SEO output into one
//! document with front matter, a single `[TOC]` placeholder and an FAQ
//! section. The first failure ends the run; nothing is retried.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blogflow::prelude::*;
//! use std::sync::Arc;
//!
//! let request = GenerationRequest::new("Remote Work Productivity", "HR managers", Tone::Professional, 1200)
//!     .with_keywords(["remote work", "productivity"]);
//! let config = ModelConfig::new(Credential::new(api_key), "gpt-4o-mini", 0.7, 1200);
//!
//! let pipeline = BlogPipeline::new(Arc::new(OpenAiCompletionClient::new(DEFAULT_BASE_URL, None)?));
//! let document = pipeline.run(&request, &config, &NoOpAdapter).await.into_result()?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod finalize;
pub mod llm;
pub mod observability;
pub mod pipeline;
pub mod presentation;
pub mod request;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{ClientSettings, Settings};
    pub use crate::core::{FailurePoint, PipelineState, StageName, StageResult};
    pub use crate::errors::{CompletionError, ConfigError, PipelineError, ValidationError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::finalize::{finalize, FinalizeStrategy, Finalizer, SeoPack};
    pub use crate::llm::{CompletionClient, CompletionRequest, Message};
    #[cfg(feature = "openai")]
    pub use crate::llm::{OpenAiCompletionClient, DEFAULT_BASE_URL};
    pub use crate::pipeline::{BlogPipeline, PipelineOutcome, RunFailure, RunSummary};
    pub use crate::presentation::{export_document, NoOpAdapter, PresentationAdapter};
    pub use crate::request::{Credential, GenerationRequest, ModelConfig, TemperatureStrategy, Tone};
}
