//! Command-line arguments and settings layering.
//!
//! Precedence: CLI flags and environment > `--config` file > defaults.

use anyhow::{Context, Result};
use blogflow::config::{timeout_from_secs, Settings};
use blogflow::finalize::FinalizeStrategy;
use blogflow::request::{parse_keywords, Credential, GenerationRequest, TemperatureStrategy, Tone};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// blogflow - turn a topic brief into an SEO-annotated blog post
#[derive(Debug, Parser)]
#[command(name = "blogflow")]
#[command(about = "Generate a publish-ready markdown blog post with a five-stage LLM pipeline")]
#[command(long_about = r#"
blogflow runs Research, Outline, Draft, Edit and SEO stages against a
chat-completion provider, then merges the edited draft and the SEO pack into
one markdown document with front matter, a [TOC] placeholder and an FAQ.

EXAMPLES:
  # Write a post to stdout
  blogflow --topic "Remote Work Productivity" --audience "HR managers" \
      --keywords "remote work, productivity"

  # Save it as remote_work_productivity.md in ./posts
  blogflow --topic "Remote Work Productivity" --audience "HR managers" --output-dir posts

CONFIGURATION:
  Settings are loaded with precedence: CLI flags > --config file > defaults.
  The API key is read from --api-key or OPENAI_API_KEY.
"#)]
#[command(version)]
pub struct Cli {
    /// Blog topic or working title
    #[arg(long)]
    pub topic: String,

    /// Who the post is for
    #[arg(long)]
    pub audience: String,

    /// Voice of the post (professional, casual, educational, persuasive, playful)
    #[arg(long, default_value = "professional")]
    pub tone: Tone,

    /// Comma-separated target keywords
    #[arg(long, default_value = "")]
    pub keywords: String,

    /// Approximate length in words (600-4000)
    #[arg(long, default_value_t = 1200)]
    pub word_target: u32,

    /// Path to a TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Base sampling temperature (0.0-1.5)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Output token cap per call (512-4096)
    #[arg(long)]
    pub max_output_tokens: Option<u32>,

    /// Use the base temperature for every stage instead of stage defaults
    #[arg(long)]
    pub fixed_temperature: bool,

    /// Let the model assemble the final document before the local merge
    #[arg(long)]
    pub assisted_finalize: bool,

    /// Only print the final document
    #[arg(long)]
    pub hide_intermediate: bool,

    /// Bound each provider call, in seconds
    #[arg(long, value_parser = parse_call_timeout)]
    pub call_timeout: Option<Duration>,

    /// Also write the document to this directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, env = "BLOGFLOW_LOG_FORMAT")]
    pub log_format: LogFormat,
}

fn parse_call_timeout(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number of seconds"))?;
    timeout_from_secs(secs)
}

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl Cli {
    /// Loads the settings file, if any, and applies flag overrides.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(model) = &self.model {
            settings.model.clone_from(model);
        }
        if let Some(temperature) = self.temperature {
            settings.temperature = temperature;
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            settings.max_output_tokens = max_output_tokens;
        }
        if self.fixed_temperature {
            settings.temperature_strategy = TemperatureStrategy::Fixed;
        }
        if self.assisted_finalize {
            settings.finalize = FinalizeStrategy::Assisted;
        }
        if self.hide_intermediate {
            settings.show_intermediate = false;
        }
        Ok(settings)
    }

    /// Builds the generation request. Validation happens in the pipeline.
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(&*self.topic, &*self.audience, self.tone, self.word_target)
            .with_keywords(parse_keywords(&self.keywords))
    }

    /// Returns the credential, empty when none was given.
    pub fn credential(&self) -> Credential {
        self.api_key.as_deref().map(Credential::new).unwrap_or_default()
    }

    /// Returns the per-call bound, `None` when unset.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["blogflow", "--topic", "Edge AI", "--audience", "CTOs"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--api-key", "sk-test"]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(cli.tone, Tone::Professional);
        assert_eq!(cli.word_target, 1200);
        assert!(cli.call_timeout().is_none());
        assert_eq!(cli.credential().expose(), "sk-test");
    }

    #[test]
    fn test_request_keywords() {
        let cli = parse(&["--keywords", " edge ai, , inference ", "--tone", "casual"]);
        let request = cli.request();

        assert_eq!(request.keywords, vec!["edge ai", "inference"]);
        assert_eq!(request.tone, Tone::Casual);
        assert_eq!(request.topic, "Edge AI");
    }

    #[test]
    fn test_unknown_tone_rejected() {
        let argv = ["blogflow", "--topic", "t", "--audience", "a", "--tone", "grumpy"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"gpt-4o\"\ntemperature = 0.3\nshow_intermediate = true").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&[
            "--config",
            &path,
            "--temperature",
            "0.9",
            "--hide-intermediate",
            "--assisted-finalize",
            "--fixed-temperature",
        ]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings.model, "gpt-4o");
        assert!((settings.temperature - 0.9).abs() < f32::EPSILON);
        assert!(!settings.show_intermediate);
        assert_eq!(settings.finalize, FinalizeStrategy::Assisted);
        assert_eq!(settings.temperature_strategy, TemperatureStrategy::Fixed);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = parse(&["--config", "/nonexistent/blogflow.toml"]);
        assert!(cli.settings().is_err());
    }

    #[test]
    fn test_call_timeout() {
        assert_eq!(
            parse(&["--call-timeout", "2.5"]).call_timeout(),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_call_timeout_out_of_range_rejected() {
        for value in ["0", "-1", "1e300", "inf", "soon"] {
            let argv = ["blogflow", "--topic", "t", "--audience", "a", "--call-timeout", value];
            assert!(Cli::try_parse_from(argv).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_config_timeout_out_of_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\ntimeout_seconds = 1e300").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let err = parse(&["--config", &path]).settings().unwrap_err();
        assert!(format!("{err:#}").contains("timeout_seconds"));
    }
}
