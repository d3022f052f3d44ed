//! Finalizer: merges the edited draft with the SEO pack into the deliverable.
//!
//! The local merge is a pure function of its two inputs, so the same inputs
//! always give the same bytes, and merging its own output again changes
//! nothing. The assisted strategy adds one model call and keeps the local
//! guarantees by re-applying the merge to the model's text.

mod markdown;
mod seo_pack;

pub use markdown::TOC_PLACEHOLDER;
pub use seo_pack::{FaqPair, SeoPack};

use crate::errors::PipelineError;
use crate::llm::{require_text, CompletionClient, CompletionRequest, Message};
use crate::observability::SpanTimer;
use crate::request::ModelConfig;
use crate::stages::fenced;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Heading the merge appends FAQ pairs under.
pub const FAQ_HEADING: &str = "Frequently Asked Questions";

/// Title used when neither the draft nor the SEO pack provides one.
pub const UNTITLED: &str = "Untitled Post";

/// Temperature of the assisted finalize call.
pub const ASSISTED_TEMPERATURE: f32 = 0.2;

const ASSISTED_SYSTEM: &str = "You are a content packager. You assemble final deliverables.";

/// How the final document is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeStrategy {
    /// Deterministic local merge, no provider call.
    #[default]
    Local,
    /// One provider call, then the local merge over its output.
    Assisted,
}

/// Merges the edited draft with raw SEO stage output.
///
/// See [`merge`] for the steps.
#[must_use]
pub fn finalize(edited_draft: &str, seo_output: &str) -> String {
    merge(edited_draft, &SeoPack::parse(seo_output))
}

/// Merges the edited draft with a parsed SEO pack.
///
/// 1. Unwraps a code fence around the whole draft, then drops YAML front
///    matter and table-of-contents placeholder lines.
/// 2. Finds the first H1 outside code fences, or synthesises one.
/// 3. Puts a single [`TOC_PLACEHOLDER`] right after the H1.
/// 4. Appends the FAQ section when the pack has pairs and the draft has no
///    FAQ heading.
/// 5. Prepends the SEO front matter.
/// 6. Normalises whitespace.
///
/// Headings from the draft are never removed.
#[must_use]
pub fn merge(edited_draft: &str, pack: &SeoPack) -> String {
    let body = markdown::strip_front_matter(markdown::unwrap_outer_fence(edited_draft));
    let lines: Vec<(&str, bool)> = markdown::classify_lines(body)
        .into_iter()
        .filter(|(line, fenced)| *fenced || !markdown::is_toc_placeholder(line))
        .collect();

    let h1 = lines
        .iter()
        .position(|(line, fenced)| !fenced && matches!(markdown::heading(line), Some((1, _))));

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 8);
    let rest = match h1 {
        Some(idx) => {
            out.extend(lines[..=idx].iter().map(|(line, _)| (*line).to_string()));
            &lines[idx + 1..]
        }
        None => {
            out.push(format!("# {}", pack.title().unwrap_or(UNTITLED)));
            &lines[..]
        }
    };
    out.push(String::new());
    out.push(TOC_PLACEHOLDER.to_string());
    out.push(String::new());
    out.extend(rest.iter().map(|(line, _)| (*line).to_string()));

    if !pack.faq().is_empty() && !has_faq_heading(body) {
        out.push(String::new());
        out.push(format!("## {FAQ_HEADING}"));
        for pair in pack.faq() {
            out.push(String::new());
            out.push(format!("### {}", pair.question));
            out.push(String::new());
            out.push(pair.answer.clone());
        }
    }

    let mut document = pack.front_matter().unwrap_or_default();
    document.push('\n');
    document.push_str(&out.join("\n"));
    markdown::normalize(&document)
}

fn has_faq_heading(text: &str) -> bool {
    markdown::headings(text).iter().any(|(_, title)| {
        let folded = title.to_lowercase();
        folded.contains("faq") || folded.contains("frequently asked questions")
    })
}

/// Returns true if every heading of `source` also appears in `candidate`,
/// counting repeats.
#[must_use]
pub fn keeps_headings(source: &str, candidate: &str) -> bool {
    let mut remaining = markdown::headings(markdown::unwrap_outer_fence(candidate));
    markdown::headings(markdown::unwrap_outer_fence(source)).into_iter().all(|wanted| {
        match remaining.iter().position(|h| *h == wanted) {
            Some(idx) => {
                remaining.remove(idx);
                true
            }
            None => false,
        }
    })
}

/// Runs the configured finalize strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Finalizer {
    strategy: FinalizeStrategy,
}

impl Finalizer {
    /// Creates a finalizer with the given strategy.
    #[must_use]
    pub fn new(strategy: FinalizeStrategy) -> Self {
        Self { strategy }
    }

    /// Returns the strategy.
    #[must_use]
    pub fn strategy(&self) -> FinalizeStrategy {
        self.strategy
    }

    /// Produces the final document.
    ///
    /// The local strategy never touches `client`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingInput`] if either input is blank, or the
    /// provider error of the assisted call.
    pub async fn run(
        &self,
        edited_draft: &str,
        seo_output: &str,
        client: &dyn CompletionClient,
        config: &ModelConfig,
    ) -> Result<String, PipelineError> {
        if edited_draft.trim().is_empty() {
            return Err(PipelineError::missing_input("edited draft"));
        }
        if seo_output.trim().is_empty() {
            return Err(PipelineError::missing_input("seo pack"));
        }

        let pack = SeoPack::parse(seo_output);
        debug!(
            title_within_cap = pack.title_within_cap(),
            description_within_cap = pack.description_within_cap(),
            faq_pairs = pack.faq().len(),
            keywords = pack.keywords().len(),
            "Parsed SEO pack"
        );

        let local = merge(edited_draft, &pack);
        if self.strategy == FinalizeStrategy::Local {
            return Ok(local);
        }

        let request = CompletionRequest::from_config(
            assisted_conversation(edited_draft, seo_output),
            config,
            config.resolve_temperature(ASSISTED_TEMPERATURE),
        );
        let timer = SpanTimer::start("finalize");
        let packaged = require_text(Some(client.complete(&request).await?))?;
        let elapsed_ms = timer.finish();

        let candidate = merge(&packaged, &pack);
        if keeps_headings(edited_draft, &candidate) {
            info!(elapsed_ms, chars = candidate.chars().count(), "Assisted finalize completed");
            Ok(candidate)
        } else {
            warn!(elapsed_ms, "Assisted finalize dropped headings, using local merge");
            Ok(local)
        }
    }
}

fn assisted_conversation(edited_draft: &str, seo_output: &str) -> Vec<Message> {
    let user = format!(
        "Combine the edited markdown with the SEO pack. Append an FAQ section if the SEO pack \
         provides one. Put a clean table of contents placeholder, [TOC], directly after the H1. \
         Keep every heading of the draft. Return the final markdown only.\n\
         \n\
         Edited Draft:\n\
         {draft}\n\
         \n\
         SEO Pack:\n\
         {seo}",
        draft = fenced(edited_draft),
        seo = fenced(seo_output),
    );
    vec![Message::system(ASSISTED_SYSTEM), Message::user(user)]
}
