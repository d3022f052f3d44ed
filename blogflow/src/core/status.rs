//! Stage names and pipeline states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five content stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Gathers facts, statistics and source names.
    Research,
    /// Turns research into a heading outline.
    Outline,
    /// Writes the full markdown draft.
    Draft,
    /// Tightens the draft without changing its structure.
    Edit,
    /// Produces metadata, keywords and FAQ pairs.
    Seo,
}

impl StageName {
    /// All stages in the fixed execution order.
    pub const ALL: [Self; 5] = [
        Self::Research,
        Self::Outline,
        Self::Draft,
        Self::Edit,
        Self::Seo,
    ];

    /// Returns the zero-based position of the stage in the run.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Research => 0,
            Self::Outline => 1,
            Self::Draft => 2,
            Self::Edit => 3,
            Self::Seo => 4,
        }
    }

    /// Returns the stage that runs after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Sampling temperature the stage uses unless the run fixes one.
    #[must_use]
    pub fn default_temperature(self) -> f32 {
        match self {
            Self::Research => 0.4,
            Self::Outline | Self::Seo => 0.5,
            Self::Draft => 0.8,
            Self::Edit => 0.3,
        }
    }

    /// Human-facing label used by presentation adapters.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Research => "Research Agent",
            Self::Outline => "Outline Agent",
            Self::Draft => "Writing Agent",
            Self::Edit => "Editing Agent",
            Self::Seo => "SEO Agent",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Research => write!(f, "Research"),
            Self::Outline => write!(f, "Outline"),
            Self::Draft => write!(f, "Draft"),
            Self::Edit => write!(f, "Edit"),
            Self::Seo => write!(f, "SEO"),
        }
    }
}

/// Where a run stopped when it did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "point", content = "stage")]
pub enum FailurePoint {
    /// Input validation rejected the request or model configuration.
    Validation,
    /// A content stage failed.
    Stage(StageName),
    /// The finalizer failed.
    Finalize,
}

impl FailurePoint {
    /// Name reported to presentation adapters.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Validation => "validation".to_string(),
            Self::Stage(stage) => stage.to_string(),
            Self::Finalize => "finalize".to_string(),
        }
    }

    /// Returns the failed stage, if the failure happened inside one.
    #[must_use]
    pub fn stage(&self) -> Option<StageName> {
        match self {
            Self::Stage(stage) => Some(*stage),
            _ => None,
        }
    }
}

impl fmt::Display for FailurePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// States of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "at")]
pub enum PipelineState {
    /// Nothing has happened yet.
    Idle,
    /// Request and model configuration are being checked.
    Validating,
    /// A content stage is in flight.
    Running(StageName),
    /// Edit and SEO outputs are being merged.
    Finalizing,
    /// The final document was produced.
    Succeeded,
    /// The run halted.
    Failed(FailurePoint),
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Idle
    }
}

impl PipelineState {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    /// Returns true if the machine may move from `self` to `next`.
    ///
    /// Legal moves: `Idle → Validating`, `Validating → Running(Research)`,
    /// `Running(k) → Running(k+1)`, `Running(Seo) → Finalizing`,
    /// `Finalizing → Succeeded`, and from the active state to the matching
    /// `Failed` point.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (Self::Idle, Self::Validating)
            | (Self::Validating, Self::Running(StageName::Research))
            | (Self::Running(StageName::Seo), Self::Finalizing)
            | (Self::Finalizing, Self::Succeeded) => true,
            (Self::Running(current), Self::Running(following)) => {
                current.next() == Some(following)
            }
            (current, Self::Failed(point)) => match point {
                FailurePoint::Validation => current == Self::Validating,
                FailurePoint::Stage(stage) => current == Self::Running(stage),
                FailurePoint::Finalize => current == Self::Finalizing,
            },
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Running(stage) => write!(f, "running({stage})"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(point) => write!(f, "failed({point})"),
        }
    }
}
