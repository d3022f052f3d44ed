//! Error types for the blogflow pipeline.
//!
//! Three kinds of failure reach callers: validation failures raised before
//! any provider call, provider failures, and empty provider responses. The
//! latter two halt the run at the current stage and are never retried or
//! replaced with placeholder content.

use crate::core::PipelineState;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

/// Inclusive bounds for `GenerationRequest::word_target`.
pub const WORD_TARGET_RANGE: (u32, u32) = (600, 4000);

/// Inclusive bounds for `ModelConfig::temperature`.
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 1.5);

/// Inclusive bounds for `ModelConfig::max_output_tokens`.
pub const MAX_OUTPUT_TOKENS_RANGE: (u32, u32) = (512, 4096);

/// Raised when a request or model configuration is malformed.
///
/// Always produced before any provider call; the caller fixes the input and
/// re-runs from the start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The topic is empty or whitespace.
    #[error("Topic must not be empty")]
    EmptyTopic,

    /// The audience is empty or whitespace.
    #[error("Audience must not be empty")]
    EmptyAudience,

    /// The word target is outside the accepted range.
    #[error("Word target {value} is outside {}..={}", WORD_TARGET_RANGE.0, WORD_TARGET_RANGE.1)]
    WordTargetOutOfRange {
        /// The rejected value.
        value: u32,
    },

    /// No credential was supplied.
    #[error("A provider credential is required")]
    MissingCredential,

    /// The model identifier is empty.
    #[error("Model identifier must not be empty")]
    EmptyModelId,

    /// The temperature is outside the accepted range or not finite.
    #[error("Temperature {value} is outside {}..={}", TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1)]
    TemperatureOutOfRange {
        /// The rejected value.
        value: f32,
    },

    /// The output token cap is outside the accepted range.
    #[error(
        "Max output tokens {value} is outside {}..={}",
        MAX_OUTPUT_TOKENS_RANGE.0,
        MAX_OUTPUT_TOKENS_RANGE.1
    )]
    MaxOutputTokensOutOfRange {
        /// The rejected value.
        value: u32,
    },

    /// A tone name did not match any known tone.
    #[error("Unknown tone '{0}'")]
    UnknownTone(String),
}

impl ValidationError {
    /// Returns a short hint for fixing the input.
    #[must_use]
    pub fn fix_hint(&self) -> &'static str {
        match self {
            Self::EmptyTopic | Self::EmptyAudience => "Fill in both Topic and Audience.",
            Self::WordTargetOutOfRange { .. } => "Pick a word target between 600 and 4000.",
            Self::MissingCredential => "Provide an API key, e.g. via OPENAI_API_KEY.",
            Self::EmptyModelId => "Choose a model identifier such as gpt-4o-mini.",
            Self::TemperatureOutOfRange { .. } => "Use a temperature between 0.0 and 1.5.",
            Self::MaxOutputTokensOutOfRange { .. } => {
                "Use a max output token count between 512 and 4096."
            }
            Self::UnknownTone(_) => {
                "Use one of Professional, Casual, Educational, Persuasive, Playful."
            }
        }
    }
}

/// Failure of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The call could not be completed: auth, rate limit, network, invalid
    /// parameters or timeout.
    #[error("Provider error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Provider {
        /// Provider-reported status code, if the provider answered at all.
        status: Option<u16>,
        /// Provider-reported or transport message.
        message: String,
    },

    /// The provider answered without any generated text.
    #[error("Provider returned no generated text")]
    EmptyResponse,
}

impl CompletionError {
    /// Creates a provider error with a status code.
    #[must_use]
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a provider error for a call that never got a response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Provider {
            status: None,
            message: message.into(),
        }
    }
}

/// The main error type reported for a failed run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The request or configuration was rejected before any provider call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A provider call failed.
    #[error("Provider error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Provider {
        /// Provider-reported status code, if any.
        status: Option<u16>,
        /// Provider-reported or transport message.
        message: String,
    },

    /// A provider call returned no usable text.
    #[error("Provider returned no generated text")]
    EmptyResponse,

    /// A stage was about to run without one of its declared inputs.
    #[error("Missing upstream input '{input}'")]
    MissingInput {
        /// Name of the absent or empty input.
        input: String,
    },

    /// The caller cancelled the run.
    #[error("Pipeline cancelled: {reason}")]
    Cancelled {
        /// The cancellation reason.
        reason: String,
    },
}

impl From<CompletionError> for PipelineError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Provider { status, message } => Self::Provider { status, message },
            CompletionError::EmptyResponse => Self::EmptyResponse,
        }
    }
}

impl PipelineError {
    /// Creates a missing-input error.
    #[must_use]
    pub fn missing_input(input: impl Into<String>) -> Self {
        Self::MissingInput {
            input: input.into(),
        }
    }

    /// Returns the error kind name used in structured reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Provider { .. } => "ProviderError",
            Self::EmptyResponse => "EmptyResponseError",
            Self::MissingInput { .. } => "MissingInputError",
            Self::Cancelled { .. } => "CancelledError",
        }
    }

    /// Returns true for provider and empty-response failures.
    ///
    /// Both are propagated identically: the run halts at the current stage.
    #[must_use]
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::EmptyResponse)
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), json!(self.kind()));
        match self {
            Self::Validation(err) => {
                map.insert("fix_hint".to_string(), json!(err.fix_hint()));
            }
            Self::Provider { status, .. } => {
                map.insert("status".to_string(), json!(status));
            }
            Self::MissingInput { input } => {
                map.insert("input".to_string(), json!(input));
            }
            Self::Cancelled { reason } => {
                map.insert("reason".to_string(), json!(reason));
            }
            Self::EmptyResponse => {}
        }
        map.insert("message".to_string(), json!(self.to_string()));
        map
    }
}

/// A state-machine move the run guard refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid pipeline transition from {from} to {to}")]
pub struct InvalidTransition {
    /// State the run was in.
    pub from: PipelineState,
    /// State that was requested.
    pub to: PipelineState,
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read settings from {path}: {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the settings schema.
    #[error("Invalid settings in {path}: {message}")]
    Parse {
        /// The path that was parsed.
        path: String,
        /// Parser message.
        message: String,
    },
}
