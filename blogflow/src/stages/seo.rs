//! SEO stage: metadata, keywords, FAQ pairs and link recommendations.

use super::{fenced, StagePrompt};
use crate::core::StageName;
use crate::request::GenerationRequest;

const SYSTEM: &str = "You are an SEO specialist. You craft search metadata and on-page \
recommendations.";

/// Soft cap for the SEO title, requested but not enforced.
pub const TITLE_SOFT_CAP: usize = 60;

/// Soft cap for the meta description, requested but not enforced.
pub const DESCRIPTION_SOFT_CAP: usize = 155;

/// SEO prompt over the brief and the edited draft.
#[derive(Debug, Clone, Copy)]
pub struct SeoPrompt<'a> {
    request: &'a GenerationRequest,
    edited: &'a str,
}

impl<'a> SeoPrompt<'a> {
    /// Binds the prompt to a request and the Edit output.
    #[must_use]
    pub fn new(request: &'a GenerationRequest, edited: &'a str) -> Self {
        Self { request, edited }
    }
}

impl StagePrompt for SeoPrompt<'_> {
    fn stage(&self) -> StageName {
        StageName::Seo
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM
    }

    fn upstream(&self) -> Vec<(&'static str, &str)> {
        vec![("edited draft", self.edited)]
    }

    fn user_prompt(&self) -> String {
        let req = self.request;
        format!(
            "Topic: {topic}\n\
             Audience: {audience}\n\
             Target keywords: {keywords}\n\
             \n\
             Based on the markdown draft below, produce:\n\
             - SEO title: at most {title_cap} characters if possible\n\
             - Meta description: at most {description_cap} characters\n\
             - URL slug\n\
             - Primary keyword, plus 4-8 secondary keywords\n\
             - FAQ: 5-7 question and answer pairs, each written as a \"Q:\" line followed by an \"A:\" line\n\
             - Recommended internal link anchors (generic) and external link types\n\
             \n\
             Start each item on its own line with its label, e.g. \"SEO title: ...\".\n\
             \n\
             Draft:\n\
             {draft}",
            topic = req.topic,
            audience = req.audience,
            keywords = req.keyword_line(),
            title_cap = TITLE_SOFT_CAP,
            description_cap = DESCRIPTION_SOFT_CAP,
            draft = fenced(self.edited),
        )
    }
}
