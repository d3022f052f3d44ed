//! Scripted completion client and recording adapter.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

use crate::core::{StageName, StageResult};
use crate::errors::{CompletionError, PipelineError};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::presentation::PresentationAdapter;

/// A completion client that replays scripted replies and records requests.
///
/// Replies are consumed in call order. Once they run out, the fixed reply is
/// used if one was set, otherwise the call fails with
/// [`CompletionError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedCompletionClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    fixed: Option<String>,
    fail_on: Option<(usize, CompletionError)>,
    delay: Option<Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletionClient {
    /// Creates a client with no replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that answers every call with `reply`.
    #[must_use]
    pub fn fixed(reply: impl Into<String>) -> Self {
        Self {
            fixed: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Creates a client that answers calls in order with `replies`.
    #[must_use]
    pub fn sequence<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Appends a scripted result, success or error.
    #[must_use]
    pub fn then(self, reply: Result<String, CompletionError>) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    /// Fails the `call`-th call (1-based) with `error`.
    #[must_use]
    pub fn failing_on(mut self, call: usize, error: CompletionError) -> Self {
        self.fail_on = Some((call, error));
        self
    }

    /// Sleeps before every reply.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns how many calls were made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Returns the user prompt of every request, in order.
    #[must_use]
    pub fn user_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| r.user_prompt().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let call = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some((n, err)) = &self.fail_on {
            if *n == call {
                return Err(err.clone());
            }
        }

        let scripted = self.replies.lock().pop_front();
        match scripted {
            Some(reply) => reply,
            None => self.fixed.clone().ok_or(CompletionError::EmptyResponse),
        }
    }
}

/// One presentation callback, as recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    /// `on_stage_complete` for this stage.
    StageComplete(StageName),
    /// `on_failure` with the reported stage name and error.
    Failure {
        /// Reported stage name.
        stage_name: String,
        /// Reported error.
        error: PipelineError,
    },
    /// `on_success` with the document and the number of stage results.
    Success {
        /// Final document.
        document: String,
        /// Number of stage results passed along.
        stage_count: usize,
    },
}

/// Presentation adapter that records every callback.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    calls: Mutex<Vec<AdapterCall>>,
}

impl RecordingAdapter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded callbacks.
    #[must_use]
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().clone()
    }

    /// Returns the stages reported complete, in order.
    #[must_use]
    pub fn completed_stages(&self) -> Vec<StageName> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                AdapterCall::StageComplete(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of `on_failure` calls.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, AdapterCall::Failure { .. }))
            .count()
    }

    /// Returns the document passed to `on_success`, if any.
    #[must_use]
    pub fn document(&self) -> Option<String> {
        self.calls.lock().iter().find_map(|c| match c {
            AdapterCall::Success { document, .. } => Some(document.clone()),
            _ => None,
        })
    }
}

impl PresentationAdapter for RecordingAdapter {
    fn on_stage_complete(&self, result: &StageResult) {
        self.calls.lock().push(AdapterCall::StageComplete(result.stage()));
    }

    fn on_failure(&self, stage_name: &str, error: &PipelineError) {
        self.calls.lock().push(AdapterCall::Failure {
            stage_name: stage_name.to_string(),
            error: error.clone(),
        });
    }

    fn on_success(&self, document: &str, stages: &[StageResult]) {
        self.calls.lock().push(AdapterCall::Success {
            document: document.to_string(),
            stage_count: stages.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;
    use crate::request::{Credential, ModelConfig};

    fn request(text: &str) -> CompletionRequest {
        let config = ModelConfig::new(Credential::new("k"), "m", 0.5, 1024);
        CompletionRequest::from_config(vec![Message::user(text)], &config, 0.5)
    }

    #[tokio::test]
    async fn test_sequence_then_fixed() {
        let client = ScriptedCompletionClient::sequence(["one", "two"]);
        assert_eq!(client.complete(&request("a")).await.unwrap(), "one");
        assert_eq!(client.complete(&request("b")).await.unwrap(), "two");
        assert_eq!(
            client.complete(&request("c")).await,
            Err(CompletionError::EmptyResponse)
        );

        let client = ScriptedCompletionClient::fixed("same");
        assert_eq!(client.complete(&request("a")).await.unwrap(), "same");
        assert_eq!(client.complete(&request("b")).await.unwrap(), "same");
    }

    #[tokio::test]
    async fn test_failing_on_records_request() {
        let client = ScriptedCompletionClient::fixed("ok")
            .failing_on(2, CompletionError::provider(500, "boom"));

        assert!(client.complete(&request("first")).await.is_ok());
        assert!(client.complete(&request("second")).await.is_err());
        assert!(client.complete(&request("third")).await.is_ok());

        assert_eq!(client.call_count(), 3);
        assert_eq!(client.user_prompts(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let client = ScriptedCompletionClient::new().then(Err(CompletionError::transport("down")));
        assert!(matches!(
            client.complete(&request("x")).await,
            Err(CompletionError::Provider { status: None, .. })
        ));
    }

    #[test]
    fn test_recording_adapter() {
        let adapter = RecordingAdapter::new();
        adapter.on_stage_complete(&StageResult::new(StageName::Research, "r"));
        adapter.on_failure("Outline", &PipelineError::EmptyResponse);

        assert_eq!(adapter.completed_stages(), vec![StageName::Research]);
        assert_eq!(adapter.failure_count(), 1);
        assert_eq!(adapter.document(), None);
    }
}
