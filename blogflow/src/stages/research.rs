//! Research stage: facts, statistics and source names for the topic.

use super::StagePrompt;
use crate::core::StageName;
use crate::request::GenerationRequest;

const SYSTEM: &str = "You are a meticulous research analyst. You gather factual points, \
recent statistics with their source names, and key references. You answer in bullet points \
and never invent URLs.";

/// Research prompt over the topic brief.
#[derive(Debug, Clone, Copy)]
pub struct ResearchPrompt<'a> {
    request: &'a GenerationRequest,
}

impl<'a> ResearchPrompt<'a> {
    /// Binds the prompt to a request.
    #[must_use]
    pub fn new(request: &'a GenerationRequest) -> Self {
        Self { request }
    }
}

impl StagePrompt for ResearchPrompt<'_> {
    fn stage(&self) -> StageName {
        StageName::Research
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM
    }

    fn upstream(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn user_prompt(&self) -> String {
        let req = self.request;
        format!(
            "Topic: {topic}\n\
             Audience: {audience}\n\
             Tone: {tone}\n\
             Target keywords: {keywords}\n\
             \n\
             Return:\n\
             - 8-12 bullet points of facts, each with brief context\n\
             - A short list of recent statistics, if relevant, each attributed to a named source\n\
             - 5-8 suggested sources, non-paywalled where possible\n\
             \n\
             Do not fabricate URLs. When a link cannot be verified, give the source name only.",
            topic = req.topic,
            audience = req.audience,
            tone = req.tone,
            keywords = req.keyword_line(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Tone;

    #[test]
    fn test_prompt_carries_brief() {
        let req = GenerationRequest::new("Edge AI", "CTOs", Tone::Persuasive, 900)
            .with_keywords(["edge inference", "latency"]);
        let prompt = ResearchPrompt::new(&req).user_prompt();

        assert!(prompt.contains("Topic: Edge AI"));
        assert!(prompt.contains("Audience: CTOs"));
        assert!(prompt.contains("Tone: Persuasive"));
        assert!(prompt.contains("Target keywords: edge inference, latency"));
        assert!(prompt.contains("8-12 bullet points"));
        assert!(prompt.contains("5-8 suggested sources"));
    }

    #[test]
    fn test_prompt_has_no_upstream() {
        let req = GenerationRequest::new("Edge AI", "CTOs", Tone::Casual, 900);
        let prompt = ResearchPrompt::new(&req);

        assert!(prompt.upstream().is_empty());
        assert_eq!(prompt.conversation().unwrap().len(), 2);
        assert!(prompt.system_prompt().contains("research analyst"));
    }
}
