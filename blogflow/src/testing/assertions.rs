//! Assertions over pipeline results.

use crate::core::{FailurePoint, StageName, StageResult};
use crate::finalize::{keeps_headings, TOC_PLACEHOLDER};
use crate::pipeline::PipelineOutcome;
use crate::testing::ScriptedCompletionClient;

/// Asserts that results carry exactly `expected` stages, in that order.
pub fn assert_stage_order(results: &[StageResult], expected: &[StageName]) {
    let actual: Vec<StageName> = results.iter().map(StageResult::stage).collect();
    assert_eq!(actual, expected, "Unexpected stage order");
}

/// Asserts that the run failed at `point`.
pub fn assert_failed_at(outcome: &PipelineOutcome, point: FailurePoint) {
    let failure = outcome
        .failure()
        .unwrap_or_else(|| panic!("Expected failure at {point}, but the run succeeded"));
    assert_eq!(failure.point, point, "Failed at the wrong point: {}", failure.error);
}

/// Asserts a single TOC placeholder that follows the first H1, with at most
/// blank lines in between.
pub fn assert_single_toc_after_h1(document: &str) {
    let lines: Vec<&str> = document.lines().collect();
    let toc_count = lines.iter().filter(|l| l.trim() == TOC_PLACEHOLDER).count();
    assert_eq!(toc_count, 1, "Expected exactly one {TOC_PLACEHOLDER}, found {toc_count}");

    let h1 = lines
        .iter()
        .position(|l| l.starts_with("# "))
        .unwrap_or_else(|| panic!("Document has no H1"));
    let next = lines[h1 + 1..]
        .iter()
        .find(|l| !l.trim().is_empty())
        .copied();
    assert_eq!(next, Some(TOC_PLACEHOLDER), "{TOC_PLACEHOLDER} must follow the H1");
}

/// Asserts that every heading of `source` survives in `document`.
pub fn assert_headings_preserved(source: &str, document: &str) {
    assert!(
        keeps_headings(source, document),
        "Document dropped headings from its source"
    );
}

/// Asserts that every user prompt the client received contains `needle`.
pub fn assert_every_prompt_contains(client: &ScriptedCompletionClient, needle: &str) {
    let prompts = client.user_prompts();
    assert!(!prompts.is_empty(), "No prompts were recorded");
    for (i, prompt) in prompts.iter().enumerate() {
        assert!(
            prompt.contains(needle),
            "Prompt {} does not contain '{needle}'",
            i + 1
        );
    }
}
