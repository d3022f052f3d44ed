//! The topic brief: what to write and for whom.

use crate::errors::{ValidationError, WORD_TARGET_RANGE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker substituted for an empty keyword list so prompt shape stays stable.
pub(crate) const NO_KEYWORDS_MARKER: &str = "no target keywords";

/// Voice the post is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tone {
    /// Measured and business-like.
    #[default]
    Professional,
    /// Conversational.
    Casual,
    /// Explanatory, teaching-oriented.
    Educational,
    /// Argues for a position.
    Persuasive,
    /// Light and humorous.
    Playful,
}

impl Tone {
    /// All tones, in the order offered to users.
    pub const ALL: [Self; 5] = [
        Self::Professional,
        Self::Casual,
        Self::Educational,
        Self::Persuasive,
        Self::Playful,
    ];
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Professional => write!(f, "Professional"),
            Self::Casual => write!(f, "Casual"),
            Self::Educational => write!(f, "Educational"),
            Self::Persuasive => write!(f, "Persuasive"),
            Self::Playful => write!(f, "Playful"),
        }
    }
}

impl FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.to_string().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownTone(wanted.to_string()))
    }
}

/// Splits a comma-separated keyword list.
///
/// Entries are trimmed, empty entries dropped, order preserved.
#[must_use]
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// What the pipeline is asked to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Blog topic or working title.
    pub topic: String,
    /// Who the post is for.
    pub audience: String,
    /// Voice of the post.
    pub tone: Tone,
    /// Target keywords, in priority order. May be empty.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Approximate length of the post in words.
    pub word_target: u32,
}

impl GenerationRequest {
    /// Creates a request with no keywords.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        audience: impl Into<String>,
        tone: Tone,
        word_target: u32,
    ) -> Self {
        Self {
            topic: topic.into(),
            audience: audience.into(),
            tone,
            keywords: Vec::new(),
            word_target,
        }
    }

    /// Sets the keyword list.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the request before any stage runs.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: empty topic, empty audience, or a
    /// word target outside `600..=4000`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if self.audience.trim().is_empty() {
            return Err(ValidationError::EmptyAudience);
        }
        let (min, max) = WORD_TARGET_RANGE;
        if !(min..=max).contains(&self.word_target) {
            return Err(ValidationError::WordTargetOutOfRange {
                value: self.word_target,
            });
        }
        Ok(())
    }

    /// Returns true if at least one keyword was supplied.
    #[must_use]
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// Keyword list as it appears in prompts.
    ///
    /// Joined with `", "`, or the `no target keywords` marker when empty.
    #[must_use]
    pub fn keyword_line(&self) -> String {
        if self.has_keywords() {
            self.keywords.join(", ")
        } else {
            NO_KEYWORDS_MARKER.to_string()
        }
    }
}
