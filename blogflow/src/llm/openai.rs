//! OpenAI-compatible chat-completions client.

use super::{require_text, CompletionClient, CompletionRequest, Message};
use crate::config::ClientSettings;
use crate::errors::CompletionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat-completions endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Longest slice of a non-JSON error body kept in a provider message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Calls an OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiCompletionClient {
    /// Creates a client for `base_url` with an optional request timeout.
    ///
    /// # Errors
    ///
    /// Returns a transport-level [`CompletionError::Provider`] if the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, CompletionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| CompletionError::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Creates a client from settings.
    ///
    /// # Errors
    ///
    /// See [`OpenAiCompletionClient::new`].
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, CompletionError> {
        Self::new(settings.base_url.clone(), settings.timeout())
    }

    /// Returns the endpoint this client posts to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(
            provider = "openai",
            model = %request.model_id,
            temperature = request.temperature,
            max_tokens = request.max_output_tokens,
            messages = request.messages.len(),
            "Invoking completion endpoint"
        );

        let body = ChatRequest::from(request);
        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(request.credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::transport(describe_transport_error(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(CompletionError::provider(
                status.as_u16(),
                provider_message(&text),
            ));
        }

        let content = parse_content(&text)?;
        debug!(provider = "openai", chars = content.len(), "Completion received");
        Ok(content)
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("Request timed out: {err}")
    } else if err.is_connect() {
        format!("Connection failed: {err}")
    } else {
        format!("Request failed: {err}")
    }
}

/// Extracts `error.message` from an error body, falling back to the raw text.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                crate::utils::truncate_chars(trimmed, MAX_ERROR_BODY_CHARS).to_string()
            }
        })
}

/// Pulls `choices[0].message.content` out of a success body.
fn parse_content(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        CompletionError::transport(format!("Failed to parse completion response: {e}"))
    })?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content);
    require_text(content)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

impl<'a> From<&'a CompletionRequest> for ChatRequest<'a> {
    fn from(req: &'a CompletionRequest) -> Self {
        Self {
            model: &req.model_id,
            messages: &req.messages,
            temperature: req.temperature,
            max_tokens: req.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Credential, ModelConfig};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn request() -> CompletionRequest {
        let config = ModelConfig::new(Credential::new("sk-test"), "gpt-4o-mini", 0.7, 1200);
        CompletionRequest::from_config(
            vec![Message::system("persona"), Message::user("task")],
            &config,
            0.4,
        )
    }

    /// Serves one canned HTTP response and returns the raw request it received.
    async fn serve_once(status_line: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if received.len() >= header_end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).to_string()
        });
        (format!("http://{addr}/v1/chat/completions"), handle)
    }

    #[test]
    fn test_request_body_shape() {
        let req = request();
        let json = serde_json::to_value(ChatRequest::from(&req)).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 1200);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "task");
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn test_parse_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#;
        assert_eq!(parse_content(body), Ok("Hello".to_string()));
    }

    #[test]
    fn test_parse_empty_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_content(body), Err(CompletionError::EmptyResponse));

        let body = r#"{"choices":[]}"#;
        assert_eq!(parse_content(body), Err(CompletionError::EmptyResponse));
    }

    #[test]
    fn test_provider_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(provider_message(body), "Incorrect API key provided");
        assert_eq!(provider_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(provider_message(""), "no response body");
    }

    #[tokio::test]
    async fn test_complete_success() {
        let (url, server) =
            serve_once("200 OK", r#"{"choices":[{"message":{"content":"- fact one"}}]}"#).await;
        let client = OpenAiCompletionClient::new(url, Some(Duration::from_secs(5))).unwrap();

        let text = client.complete(&request()).await.unwrap();
        assert_eq!(text, "- fact one");

        let raw = server.await.unwrap();
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(raw.contains(r#""model":"gpt-4o-mini""#));
    }

    #[tokio::test]
    async fn test_complete_maps_status() {
        let (url, server) = serve_once(
            "429 Too Many Requests",
            r#"{"error":{"message":"Rate limit reached"}}"#,
        )
        .await;
        let client = OpenAiCompletionClient::new(url, None).unwrap();

        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err, CompletionError::provider(429, "Rate limit reached"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_complete_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OpenAiCompletionClient::new(format!("http://{addr}/"), None).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Provider { status: None, .. }));
    }
}
