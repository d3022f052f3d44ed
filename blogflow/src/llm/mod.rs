//! Completion client: one round trip to a text-completion service.
//!
//! The pipeline treats the provider as a black box. It hands over an ordered
//! conversation plus generation parameters and gets back text or a
//! [`CompletionError`]. No retries, streaming, caching or local token counting
//! happen at this layer; identical requests may yield different text.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiCompletionClient, DEFAULT_BASE_URL};

use crate::errors::CompletionError;
use crate::request::{Credential, ModelConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona and responsibility framing.
    System,
    /// Task and supplied context.
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Everything one provider call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Conversation, sent as-is and in order.
    pub messages: Vec<Message>,
    /// Model identifier.
    pub model_id: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output token cap.
    pub max_output_tokens: u32,
    /// Provider credential.
    pub credential: Credential,
}

impl CompletionRequest {
    /// Builds a request from a conversation and the run's model settings.
    #[must_use]
    pub fn from_config(messages: Vec<Message>, config: &ModelConfig, temperature: f32) -> Self {
        Self {
            messages,
            model_id: config.model_id.clone(),
            temperature,
            max_output_tokens: config.max_output_tokens,
            credential: config.credential.clone(),
        }
    }

    /// Returns the system message text, if any.
    #[must_use]
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// Returns the user message text, if any.
    #[must_use]
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// A text-completion service.
///
/// Implementations must return [`CompletionError::EmptyResponse`] rather than
/// an empty string when the provider produced no text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Performs one completion call.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Rejects blank provider text.
///
/// # Errors
///
/// Returns [`CompletionError::EmptyResponse`] if `text` is absent or only
/// whitespace.
pub fn require_text(text: Option<String>) -> Result<String, CompletionError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(CompletionError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::system("s").role, Role::System);
        assert_eq!(Message::user("u").role, Role::User);
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn test_role_serialize() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn test_request_from_config() {
        let config = ModelConfig::new(Credential::new("k"), "gpt-4o", 0.7, 2048);
        let req = CompletionRequest::from_config(
            vec![Message::system("persona"), Message::user("task")],
            &config,
            0.4,
        );

        assert_eq!(req.model_id, "gpt-4o");
        assert_eq!(req.max_output_tokens, 2048);
        assert!((req.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(req.system_prompt(), Some("persona"));
        assert_eq!(req.user_prompt(), Some("task"));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("x".to_string())), Ok("x".to_string()));
        assert_eq!(require_text(Some(" \n".to_string())), Err(CompletionError::EmptyResponse));
        assert_eq!(require_text(None), Err(CompletionError::EmptyResponse));
    }
}
