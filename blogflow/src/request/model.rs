//! Model settings shared by every provider call in a run.

use crate::core::StageName;
use crate::errors::{ValidationError, MAX_OUTPUT_TOKENS_RANGE, TEMPERATURE_RANGE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque provider credential.
///
/// Debug and Display print a redaction marker. There is no `Serialize` impl.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the secret for use in an outgoing request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if no secret is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// How each stage picks its sampling temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureStrategy {
    /// Each stage uses its own contract default.
    #[default]
    StageDefaults,
    /// Every call uses `ModelConfig::temperature`.
    Fixed,
}

/// Provider settings for one run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    /// Provider credential.
    pub credential: Credential,
    /// Model identifier, e.g. `gpt-4o-mini`.
    pub model_id: String,
    /// Base sampling temperature.
    pub temperature: f32,
    /// Output token cap per call.
    pub max_output_tokens: u32,
    /// Whether stages override `temperature` with their own defaults.
    #[serde(default)]
    pub temperature_strategy: TemperatureStrategy,
}

impl ModelConfig {
    /// Creates a config with stage-default temperatures.
    #[must_use]
    pub fn new(
        credential: Credential,
        model_id: impl Into<String>,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            credential,
            model_id: model_id.into(),
            temperature,
            max_output_tokens,
            temperature_strategy: TemperatureStrategy::default(),
        }
    }

    /// Sets the temperature strategy.
    #[must_use]
    pub fn with_temperature_strategy(mut self, strategy: TemperatureStrategy) -> Self {
        self.temperature_strategy = strategy;
        self
    }

    /// Temperature used for a call made by `stage`.
    #[must_use]
    pub fn temperature_for(&self, stage: StageName) -> f32 {
        self.resolve_temperature(stage.default_temperature())
    }

    /// Applies the strategy to a contract default.
    #[must_use]
    pub fn resolve_temperature(&self, contract_default: f32) -> f32 {
        match self.temperature_strategy {
            TemperatureStrategy::StageDefaults => contract_default,
            TemperatureStrategy::Fixed => self.temperature,
        }
    }

    /// Checks the config before any stage runs.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: missing credential, empty model id,
    /// temperature outside `0.0..=1.5`, or token cap outside `512..=4096`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.credential.is_empty() {
            return Err(ValidationError::MissingCredential);
        }
        if self.model_id.trim().is_empty() {
            return Err(ValidationError::EmptyModelId);
        }
        let (t_min, t_max) = TEMPERATURE_RANGE;
        if !self.temperature.is_finite() || !(t_min..=t_max).contains(&self.temperature) {
            return Err(ValidationError::TemperatureOutOfRange {
                value: self.temperature,
            });
        }
        let (m_min, m_max) = MAX_OUTPUT_TOKENS_RANGE;
        if !(m_min..=m_max).contains(&self.max_output_tokens) {
            return Err(ValidationError::MaxOutputTokensOutOfRange {
                value: self.max_output_tokens,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ModelConfig {
        ModelConfig::new(Credential::new("sk-test"), "gpt-4o-mini", 0.7, 1200)
    }

    #[test]
    fn test_credential_redacted() {
        let cred = Credential::new("sk-very-secret");
        assert_eq!(format!("{cred:?}"), "Credential(***)");
        assert_eq!(cred.to_string(), "***");
        assert_eq!(cred.expose(), "sk-very-secret");

        let debug = format!("{:?}", config());
        assert!(!debug.contains("sk-test"));
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_missing_credential() {
        let cfg = ModelConfig { credential: Credential::default(), ..config() };
        assert_eq!(cfg.validate(), Err(ValidationError::MissingCredential));

        let cfg = ModelConfig { credential: Credential::new("  "), ..config() };
        assert_eq!(cfg.validate(), Err(ValidationError::MissingCredential));
    }

    #[test]
    fn test_range_checks() {
        let cfg = ModelConfig { temperature: 1.6, ..config() };
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::TemperatureOutOfRange { .. })
        ));

        let cfg = ModelConfig { temperature: f32::NAN, ..config() };
        assert!(cfg.validate().is_err());

        let cfg = ModelConfig { max_output_tokens: 4097, ..config() };
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::MaxOutputTokensOutOfRange { value: 4097 })
        );

        let cfg = ModelConfig { model_id: " ".to_string(), ..config() };
        assert_eq!(cfg.validate(), Err(ValidationError::EmptyModelId));
    }

    #[test]
    fn test_temperature_strategy() {
        let cfg = config();
        assert!((cfg.temperature_for(StageName::Draft) - 0.8).abs() < f32::EPSILON);

        let cfg = config().with_temperature_strategy(TemperatureStrategy::Fixed);
        assert!((cfg.temperature_for(StageName::Draft) - 0.7).abs() < f32::EPSILON);
        assert!((cfg.resolve_temperature(0.2) - 0.7).abs() < f32::EPSILON);
    }
}
