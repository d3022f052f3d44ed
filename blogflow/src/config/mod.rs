//! Settings for a blogflow front end.
//!
//! Defaults live here, not in the core types: the orchestrator only ever sees
//! an explicit [`ModelConfig`] built from these settings plus a credential.

use crate::errors::ConfigError;
use crate::finalize::FinalizeStrategy;
use crate::request::{Credential, ModelConfig, TemperatureStrategy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// HTTP client settings for the completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Chat-completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Zero disables the timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout() -> f64 {
    120.0
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ClientSettings {
    /// Gets the timeout as a Duration, `None` when disabled or not representable.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_seconds).ok()
    }

    fn check(&self) -> Result<(), String> {
        if self.timeout_seconds == 0.0 {
            return Ok(());
        }
        timeout_from_secs(self.timeout_seconds)
            .map(|_| ())
            .map_err(|e| format!("client.timeout_seconds: {e}"))
    }
}

/// Converts a positive number of seconds to a [`Duration`].
///
/// # Errors
///
/// Returns a message when `secs` is zero, negative, NaN, infinite, or too
/// large for a `Duration`.
pub fn timeout_from_secs(secs: f64) -> Result<Duration, String> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(format!("timeout must be greater than zero, got {secs}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("timeout of {secs} seconds: {e}"))
}

/// Front-end settings, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Output token cap per call.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Stage temperature strategy.
    #[serde(default)]
    pub temperature_strategy: TemperatureStrategy,
    /// Whether intermediate stage outputs are shown.
    #[serde(default = "default_show_intermediate")]
    pub show_intermediate: bool,
    /// How the final document is assembled.
    #[serde(default)]
    pub finalize: FinalizeStrategy,
    /// Provider HTTP client settings.
    #[serde(default)]
    pub client: ClientSettings,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    1200
}

fn default_show_intermediate() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            temperature_strategy: TemperatureStrategy::default(),
            show_intermediate: default_show_intermediate(),
            finalize: FinalizeStrategy::default(),
            client: ClientSettings::default(),
        }
    }
}

impl Settings {
    /// Creates settings with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML, wrong value types, or
    /// a client timeout that is negative or out of range.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: origin.to_string(),
            message,
        };
        let settings: Self = toml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
        settings.client.check().map_err(parse_error)?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &display)
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builds the per-run model config. Validation happens in the pipeline.
    #[must_use]
    pub fn model_config(&self, credential: Credential) -> ModelConfig {
        ModelConfig::new(
            credential,
            self.model.clone(),
            self.temperature,
            self.max_output_tokens,
        )
        .with_temperature_strategy(self.temperature_strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_output_tokens, 1200);
        assert!(settings.show_intermediate);
        assert_eq!(settings.finalize, FinalizeStrategy::Local);
        assert_eq!(settings.client.timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_partial_toml() {
        let text = r#"
            model = "gpt-4o"
            temperature_strategy = "fixed"
            finalize = "assisted"

            [client]
            timeout_seconds = 0.0
        "#;
        let settings = Settings::from_toml_str(text, "inline").unwrap();

        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.temperature_strategy, TemperatureStrategy::Fixed);
        assert_eq!(settings.finalize, FinalizeStrategy::Assisted);
        assert_eq!(settings.client.timeout(), None);
        assert_eq!(settings.client.base_url, default_base_url());
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Settings::from_toml_str("max_output_tokens = \"lots\"", "bad.toml").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_unrepresentable_timeout_rejected() {
        for value in ["1e300", "-5.0", "inf", "nan"] {
            let text = format!("[client]\ntimeout_seconds = {value}\n");
            let err = Settings::from_toml_str(&text, "slow.toml").unwrap_err();
            match err {
                ConfigError::Parse { path, message } => {
                    assert_eq!(path, "slow.toml");
                    assert!(message.contains("timeout_seconds"), "{value}: {message}");
                }
                other => panic!("expected a parse error for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_timeout_from_secs() {
        assert_eq!(timeout_from_secs(2.5), Ok(Duration::from_millis(2500)));
        assert!(timeout_from_secs(0.0).is_err());
        assert!(timeout_from_secs(f64::MAX).is_err());
        assert_eq!(
            ClientSettings {
                timeout_seconds: 1e300,
                ..ClientSettings::default()
            }
            .timeout(),
            None
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/blogflow.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_model_config() {
        let config = Settings::new().with_model("gpt-4.1-mini").model_config(Credential::new("k"));
        assert_eq!(config.model_id, "gpt-4.1-mini");
        assert!(config.validate().is_ok());
    }
}
