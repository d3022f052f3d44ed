//! Outline stage: titles, H1 and a sized heading outline.

use super::{fenced, StagePrompt};
use crate::core::StageName;
use crate::request::GenerationRequest;

const SYSTEM: &str = "You are a senior content strategist. You create logical, SEO-friendly \
outlines for long-form blog posts.";

/// Outline prompt over the brief and the research notes.
#[derive(Debug, Clone, Copy)]
pub struct OutlinePrompt<'a> {
    request: &'a GenerationRequest,
    research: &'a str,
}

impl<'a> OutlinePrompt<'a> {
    /// Binds the prompt to a request and the Research output.
    #[must_use]
    pub fn new(request: &'a GenerationRequest, research: &'a str) -> Self {
        Self { request, research }
    }
}

impl StagePrompt for OutlinePrompt<'_> {
    fn stage(&self) -> StageName {
        StageName::Outline
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM
    }

    fn upstream(&self) -> Vec<(&'static str, &str)> {
        vec![("research", self.research)]
    }

    fn user_prompt(&self) -> String {
        let req = self.request;
        format!(
            "Create an outline for a blog post on \"{topic}\".\n\
             Audience: {audience}\n\
             Tone: {tone}\n\
             Target keywords: {keywords}\n\
             Word target: ~{words} words.\n\
             \n\
             Use the research below to inform the structure. Do not repeat it verbatim.\n\
             {research}\n\
             \n\
             Return:\n\
             - 3 title ideas\n\
             - One H1\n\
             - An H2/H3 outline with approximate word counts per section\n\
             - Notes on where to include statistics, examples or visuals\n\
             - Suggested placement of internal and external links",
            topic = req.topic,
            audience = req.audience,
            tone = req.tone,
            keywords = req.keyword_line(),
            words = req.word_target,
            research = fenced(self.research),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Tone;

    #[test]
    fn test_prompt_embeds_research_verbatim() {
        let req = GenerationRequest::new("Remote Work Productivity", "HR managers", Tone::Professional, 1200);
        let research = "- Fact A (Source: Gallup)\n- Fact B";
        let prompt = OutlinePrompt::new(&req, research).user_prompt();

        assert!(prompt.contains("\"Remote Work Productivity\""));
        assert!(prompt.contains("Audience: HR managers"));
        assert!(prompt.contains(research));
        assert!(prompt.contains("Word target: ~1200 words."));
        assert!(prompt.contains("3 title ideas"));
    }
}
