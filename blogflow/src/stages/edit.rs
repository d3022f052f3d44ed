//! Edit stage: tighten the draft without touching its structure.

use super::{fenced, StagePrompt};
use crate::core::StageName;
use crate::request::GenerationRequest;

const SYSTEM: &str = "You are a seasoned editor focused on clarity, flow and correctness. \
You keep the author's voice while tightening the text.";

/// Edit prompt over the draft.
#[derive(Debug, Clone, Copy)]
pub struct EditPrompt<'a> {
    request: &'a GenerationRequest,
    draft: &'a str,
}

impl<'a> EditPrompt<'a> {
    /// Binds the prompt to a request and the Draft output.
    ///
    /// Only the audience, tone and keywords of the request are used.
    #[must_use]
    pub fn new(request: &'a GenerationRequest, draft: &'a str) -> Self {
        Self { request, draft }
    }
}

impl StagePrompt for EditPrompt<'_> {
    fn stage(&self) -> StageName {
        StageName::Edit
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM
    }

    fn upstream(&self) -> Vec<(&'static str, &str)> {
        vec![("draft", self.draft)]
    }

    fn user_prompt(&self) -> String {
        let req = self.request;
        format!(
            "Edit the markdown draft below for clarity, flow, correctness and concision.\n\
             Audience: {audience}\n\
             Maintain the intended tone: {tone}\n\
             Target keywords: {keywords}\n\
             Preserve the markdown structure. Keep every heading, its wording and its order.\n\
             \n\
             {draft}\n\
             \n\
             Return the revised markdown in full, not a list of changes.",
            audience = req.audience,
            tone = req.tone,
            keywords = req.keyword_line(),
            draft = fenced(self.draft),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Tone;

    #[test]
    fn test_prompt_keeps_tone_and_draft() {
        let req = GenerationRequest::new("Edge AI", "CTOs", Tone::Playful, 1500);
        let draft = "# Edge AI\n\nBody text.";
        let prompt = EditPrompt::new(&req, draft).user_prompt();

        assert!(prompt.contains("Maintain the intended tone: Playful"));
        assert!(prompt.contains("Audience: CTOs"));
        assert!(prompt.contains(draft));
        assert!(prompt.contains("in full"));
        assert!(!prompt.contains("Edge AI\"."));
    }
}
