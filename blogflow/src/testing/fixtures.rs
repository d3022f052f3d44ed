//! Fixtures for pipeline tests.

use crate::core::StageName;
use crate::request::{Credential, GenerationRequest, ModelConfig, Tone};

/// Builder for generation requests with test defaults.
#[derive(Debug, Clone)]
pub struct TestRequest {
    request: GenerationRequest,
}

impl Default for TestRequest {
    fn default() -> Self {
        Self {
            request: sample_request(),
        }
    }
}

impl TestRequest {
    /// Starts from [`sample_request`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.request.topic = topic.into();
        self
    }

    /// Sets the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.request.audience = audience.into();
        self
    }

    /// Sets the tone.
    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.request.tone = tone;
        self
    }

    /// Replaces the keywords.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the word target.
    #[must_use]
    pub fn with_word_target(mut self, word_target: u32) -> Self {
        self.request.word_target = word_target;
        self
    }

    /// Returns the request.
    #[must_use]
    pub fn build(self) -> GenerationRequest {
        self.request
    }
}

/// "Remote Work Productivity" for HR managers, professional tone, two
/// keywords, 1200 words.
#[must_use]
pub fn sample_request() -> GenerationRequest {
    GenerationRequest::new(
        "Remote Work Productivity",
        "HR managers",
        Tone::Professional,
        1200,
    )
    .with_keywords(["remote work", "productivity"])
}

/// `gpt-4o-mini`, temperature 0.7, 1200 output tokens, test credential.
#[must_use]
pub fn sample_config() -> ModelConfig {
    ModelConfig::new(Credential::new("sk-test"), "gpt-4o-mini", 0.7, 1200)
}

/// A fixed reply usable for every stage: an H1, sections and FAQ pairs.
#[must_use]
pub fn stub_reply() -> String {
    "\
# Remote Work Productivity

[TOC]

Remote teams can be as productive as co-located ones (Source: Stanford, 2023).

## Measuring Output

Focus on outcomes rather than hours online.

## Keeping People Engaged

Regular one-to-ones help.

SEO title: Remote Work Productivity for HR Managers
Meta description: How HR managers can measure and improve remote team output.
URL slug: remote-work-productivity
Primary keyword: remote work productivity
Secondary keywords: remote work, productivity, hybrid teams, employee engagement

Q: How do you measure remote productivity?
A: Track outcomes and delivery, not hours.

Q: Does remote work reduce engagement?
A: Not when managers hold regular check-ins.
"
    .to_string()
}

/// Distinct, plausible outputs for each stage, in stage order.
#[must_use]
pub fn sample_stage_outputs() -> [(StageName, String); 5] {
    [
        (
            StageName::Research,
            "- Remote workers report fewer interruptions (Source: Owl Labs, 2023)\n\
             - Hybrid schedules improve retention (Source: Gallup)\n"
                .to_string(),
        ),
        (
            StageName::Outline,
            "Title ideas:\n1. Remote Work That Works\n\n# Remote Work Productivity\n\
             ## Measuring Output (~400 words)\n## Keeping People Engaged (~400 words)\n"
                .to_string(),
        ),
        (
            StageName::Draft,
            "# Remote Work Productivity\n\n[TOC]\n\nIntro.\n\n## Measuring Output\n\nDraft text.\n\n\
             ## Keeping People Engaged\n\nDraft text.\n"
                .to_string(),
        ),
        (
            StageName::Edit,
            "# Remote Work Productivity\n\n[TOC]\n\nIntro, edited.\n\n## Measuring Output\n\nEdited text.\n\n\
             ## Keeping People Engaged\n\nEdited text.\n"
                .to_string(),
        ),
        (
            StageName::Seo,
            "SEO title: Remote Work Productivity for HR Managers\n\
             Meta description: Measure and improve remote output.\n\
             URL slug: remote-work-productivity\n\
             Primary keyword: remote work productivity\n\
             Secondary keywords: remote work, productivity, hybrid teams, engagement\n\
             \n\
             Q: How do you measure remote productivity?\n\
             A: Track outcomes, not hours.\n"
                .to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        assert!(sample_request().validate().is_ok());
        assert!(sample_config().validate().is_ok());

        let stages: Vec<StageName> = sample_stage_outputs().iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, StageName::ALL.to_vec());
    }

    #[test]
    fn test_request_builder() {
        let req = TestRequest::new()
            .with_topic("Edge AI")
            .with_keywords(Vec::<String>::new())
            .with_word_target(599)
            .build();

        assert_eq!(req.topic, "Edge AI");
        assert!(!req.has_keywords());
        assert!(req.validate().is_err());
    }
}
