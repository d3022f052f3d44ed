//! Stage contracts.
//!
//! Each stage fixes a system framing (persona and responsibility) and builds
//! a user framing from its typed inputs. Running a stage is exactly one
//! provider call; stages never call each other. The orchestrator composes
//! them and threads earlier outputs forward.

mod draft;
mod edit;
mod outline;
mod research;
mod seo;

pub use draft::DraftPrompt;
pub use edit::EditPrompt;
pub use outline::OutlinePrompt;
pub use research::ResearchPrompt;
pub use seo::{SeoPrompt, DESCRIPTION_SOFT_CAP, TITLE_SOFT_CAP};

use crate::core::{StageName, StageResult};
use crate::errors::PipelineError;
use crate::llm::{require_text, CompletionClient, CompletionRequest, Message};
use crate::observability::SpanTimer;
use crate::request::ModelConfig;
use std::fmt::Debug;
use tracing::{debug, info};

/// A stage's prompt contract bound to its inputs.
pub trait StagePrompt: Send + Sync + Debug {
    /// Returns the stage this prompt belongs to.
    fn stage(&self) -> StageName;

    /// Persona and responsibility framing.
    fn system_prompt(&self) -> &'static str;

    /// Upstream stage outputs this prompt embeds, by input name.
    fn upstream(&self) -> Vec<(&'static str, &str)>;

    /// Task framing with the supplied context.
    fn user_prompt(&self) -> String;

    /// Builds the `system` then `user` conversation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingInput`] if any declared upstream input
    /// is empty or whitespace.
    fn conversation(&self) -> Result<Vec<Message>, PipelineError> {
        if let Some((name, _)) = self
            .upstream()
            .into_iter()
            .find(|(_, text)| text.trim().is_empty())
        {
            return Err(PipelineError::missing_input(name));
        }
        Ok(vec![
            Message::system(self.system_prompt()),
            Message::user(self.user_prompt()),
        ])
    }
}

/// Runs one stage: builds its conversation and makes the provider call.
///
/// # Errors
///
/// Returns [`PipelineError::MissingInput`] before calling the provider when
/// an upstream input is empty, [`PipelineError::EmptyResponse`] when the
/// provider answers with blank text, otherwise the provider's error.
pub async fn execute_stage(
    prompt: &dyn StagePrompt,
    client: &dyn CompletionClient,
    config: &ModelConfig,
) -> Result<StageResult, PipelineError> {
    let stage = prompt.stage();
    let messages = prompt.conversation()?;
    let temperature = config.temperature_for(stage);
    let request = CompletionRequest::from_config(messages, config, temperature);

    debug!(
        stage = %stage,
        model = %config.model_id,
        temperature,
        prompt_chars = request.user_prompt().map_or(0, str::len),
        "Calling provider"
    );

    let timer = SpanTimer::start(stage.to_string());
    let content = require_text(Some(client.complete(&request).await?))?;
    let elapsed_ms = timer.finish();

    info!(stage = %stage, elapsed_ms, chars = content.chars().count(), "Stage completed");
    Ok(StageResult::new(stage, content).with_elapsed_ms(elapsed_ms))
}

/// Wraps upstream text in `---` fences so it is embedded verbatim.
pub(crate) fn fenced(text: &str) -> String {
    format!("---\n{}\n---", text.trim_end())
}
