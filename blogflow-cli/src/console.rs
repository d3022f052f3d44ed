//! Console presentation adapter.

use blogflow::core::StageResult;
use blogflow::errors::PipelineError;
use blogflow::presentation::PresentationAdapter;
use parking_lot::Mutex;
use std::io::{self, Write};
use tracing::warn;

/// Writes stage outputs and the final document to `out`, failures to `err`.
///
/// Intermediate outputs are only printed when `show_intermediate` is set.
/// The final document is always printed.
pub struct ConsoleAdapter<W: Write + Send> {
    out: Mutex<W>,
    err: Mutex<W>,
    show_intermediate: bool,
}

impl ConsoleAdapter<Box<dyn Write + Send>> {
    /// Creates an adapter over stdout and stderr.
    pub fn stdio(show_intermediate: bool) -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()), show_intermediate)
    }
}

impl<W: Write + Send> ConsoleAdapter<W> {
    /// Creates an adapter over the given writers.
    pub fn new(out: W, err: W, show_intermediate: bool) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            show_intermediate,
        }
    }

    /// Returns the writers.
    pub fn into_parts(self) -> (W, W) {
        (self.out.into_inner(), self.err.into_inner())
    }

    fn write(target: &Mutex<W>, text: &str) {
        let mut guard = target.lock();
        if let Err(e) = guard.write_all(text.as_bytes()).and_then(|()| guard.flush()) {
            warn!(error = %e, "Failed to write console output");
        }
    }
}

impl<W: Write + Send> PresentationAdapter for ConsoleAdapter<W> {
    fn on_stage_complete(&self, result: &StageResult) {
        if !self.show_intermediate {
            return;
        }
        let label = result.stage().label();
        let text = format!(
            "==== {label} ({:.1}s) ====\n\n{}\n\n",
            result.elapsed_ms() / 1000.0,
            result.content().trim_end()
        );
        Self::write(&self.out, &text);
    }

    fn on_failure(&self, stage_name: &str, error: &PipelineError) {
        let mut text = format!("Error in {stage_name}: {error}\n");
        if let PipelineError::Validation(err) = error {
            text.push_str(&format!("Hint: {}\n", err.fix_hint()));
        } else if error.is_provider_failure() {
            text.push_str("Hint: Check the API key, the model name and network access, then run again.\n");
        }
        Self::write(&self.err, &text);
    }

    fn on_success(&self, document: &str, _stages: &[StageResult]) {
        let text = if self.show_intermediate {
            format!("==== Final Document ====\n\n{document}")
        } else {
            document.to_string()
        };
        Self::write(&self.out, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogflow::core::StageName;
    use blogflow::errors::ValidationError;

    fn render(adapter: ConsoleAdapter<Vec<u8>>) -> (String, String) {
        let (out, err) = adapter.into_parts();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_intermediate_output_shown() {
        let adapter = ConsoleAdapter::new(Vec::new(), Vec::new(), true);
        adapter.on_stage_complete(&StageResult::new(StageName::Research, "- fact\n").with_elapsed_ms(1500.0));
        adapter.on_success("# Post\n", &[]);

        let (out, err) = render(adapter);
        assert!(out.starts_with("==== Research Agent (1.5s) ====\n\n- fact\n\n"));
        assert!(out.ends_with("==== Final Document ====\n\n# Post\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_intermediate_output_hidden() {
        let adapter = ConsoleAdapter::new(Vec::new(), Vec::new(), false);
        adapter.on_stage_complete(&StageResult::new(StageName::Draft, "# Draft\n"));
        adapter.on_success("# Post\n", &[]);

        let (out, _) = render(adapter);
        assert_eq!(out, "# Post\n");
    }

    #[test]
    fn test_validation_failure_shows_hint() {
        let adapter = ConsoleAdapter::new(Vec::new(), Vec::new(), true);
        adapter.on_failure("validation", &ValidationError::EmptyTopic.into());

        let (out, err) = render(adapter);
        assert!(out.is_empty());
        assert_eq!(
            err,
            "Error in validation: Validation error: Topic must not be empty\n\
             Hint: Fill in both Topic and Audience.\n"
        );
    }

    #[test]
    fn test_provider_failure() {
        let adapter = ConsoleAdapter::new(Vec::new(), Vec::new(), false);
        adapter.on_failure(
            "Draft",
            &PipelineError::Provider {
                status: Some(429),
                message: "rate limited".to_string(),
            },
        );

        let (_, err) = render(adapter);
        assert_eq!(
            err,
            "Error in Draft: Provider error (429): rate limited\n\
             Hint: Check the API key, the model name and network access, then run again.\n"
        );
    }

    #[test]
    fn test_cancelled_run_has_no_hint() {
        let adapter = ConsoleAdapter::new(Vec::new(), Vec::new(), false);
        adapter.on_failure(
            "Outline",
            &PipelineError::Cancelled {
                reason: "interrupted".to_string(),
            },
        );

        let (_, err) = render(adapter);
        assert!(err.starts_with("Error in Outline: "));
        assert!(!err.contains("Hint:"));
    }
}
