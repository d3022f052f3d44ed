//! Immutable output of one completed stage.

use super::StageName;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// The labelled text produced by one stage invocation.
///
/// Created once by the orchestrator when a stage's provider call returns and
/// never modified afterwards. Later stages read `content` while building their
/// prompts; presentation adapters receive it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    stage: StageName,
    content: String,
    #[serde(default)]
    elapsed_ms: f64,
}

impl StageResult {
    /// Creates a result for `stage` holding `content`.
    #[must_use]
    pub fn new(stage: StageName, content: impl Into<String>) -> Self {
        Self {
            stage,
            content: content.into(),
            elapsed_ms: 0.0,
        }
    }

    /// Records how long the provider call took.
    #[must_use]
    pub fn with_elapsed_ms(mut self, elapsed_ms: f64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Returns the stage that produced this result.
    #[must_use]
    pub fn stage(&self) -> StageName {
        self.stage
    }

    /// Returns the stage name as displayed to callers (e.g. `"SEO"`).
    #[must_use]
    pub fn stage_name(&self) -> String {
        self.stage.to_string()
    }

    /// Returns the generated text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the provider round-trip time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Hex SHA-256 of the content.
    ///
    /// Provider output is non-deterministic, so two runs with the same request
    /// are compared by fingerprint rather than by re-running.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.content.as_bytes()))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("stage_name".to_string(), serde_json::json!(self.stage_name()));
        map.insert("content".to_string(), serde_json::json!(self.content));
        map.insert("elapsed_ms".to_string(), serde_json::json!(self.elapsed_ms));
        map.insert("fingerprint".to_string(), serde_json::json!(self.fingerprint()));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accessors() {
        let result = StageResult::new(StageName::Seo, "title: x").with_elapsed_ms(12.5);

        assert_eq!(result.stage(), StageName::Seo);
        assert_eq!(result.stage_name(), "SEO");
        assert_eq!(result.content(), "title: x");
        assert!((result.elapsed_ms() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fingerprint_depends_on_content_only() {
        let a = StageResult::new(StageName::Research, "facts").with_elapsed_ms(1.0);
        let b = StageResult::new(StageName::Research, "facts").with_elapsed_ms(99.0);
        let c = StageResult::new(StageName::Research, "other facts");

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_to_dict() {
        let dict = StageResult::new(StageName::Outline, "# H1").to_dict();
        assert_eq!(dict.get("stage_name").unwrap(), "Outline");
        assert_eq!(dict.get("content").unwrap(), "# H1");
    }
}
