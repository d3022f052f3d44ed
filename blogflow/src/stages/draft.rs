//! Draft stage: the full markdown post.

use super::{fenced, StagePrompt};
use crate::core::StageName;
use crate::request::GenerationRequest;

const SYSTEM: &str = "You are a staff content writer. You produce clear, engaging, \
well-structured markdown that follows the given outline, and you cite sources inline.";

/// Draft prompt over the outline and the research notes.
#[derive(Debug, Clone, Copy)]
pub struct DraftPrompt<'a> {
    request: &'a GenerationRequest,
    outline: &'a str,
    research: &'a str,
}

impl<'a> DraftPrompt<'a> {
    /// Binds the prompt to a request and the Outline and Research outputs.
    #[must_use]
    pub fn new(request: &'a GenerationRequest, outline: &'a str, research: &'a str) -> Self {
        Self {
            request,
            outline,
            research,
        }
    }
}

impl StagePrompt for DraftPrompt<'_> {
    fn stage(&self) -> StageName {
        StageName::Draft
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM
    }

    fn upstream(&self) -> Vec<(&'static str, &str)> {
        vec![("outline", self.outline), ("research", self.research)]
    }

    fn user_prompt(&self) -> String {
        let req = self.request;
        format!(
            "Write the full draft in markdown for the topic \"{topic}\".\n\
             Audience: {audience}\n\
             Tone: {tone}\n\
             Target keywords: {keywords}\n\
             \n\
             Follow this outline strictly. Use its headings verbatim and in the same order:\n\
             {outline}\n\
             \n\
             Incorporate relevant points from this research where helpful:\n\
             {research}\n\
             \n\
             Guidelines:\n\
             - Use headings (#, ##, ###), short paragraphs and occasional bullet lists.\n\
             - Put a table of contents placeholder, [TOC], directly after the H1.\n\
             - Keep claims grounded. Attribute every statistic or specific figure, e.g. \"(Source: Organization, Year)\".\n\
             - Do not fabricate links. Name the source even when the link is unknown.",
            topic = req.topic,
            audience = req.audience,
            tone = req.tone,
            keywords = req.keyword_line(),
            outline = fenced(self.outline),
            research = fenced(self.research),
        )
    }
}
