//! Forward-only run state guard.

use crate::core::PipelineState;
use crate::errors::InvalidTransition;

/// Tracks the current state of one run and every state it has visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    current: PipelineState,
    history: Vec<PipelineState>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            current: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }
}

impl RunState {
    /// Creates a guard in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn current(&self) -> PipelineState {
        self.current
    }

    /// Returns every state visited so far, starting with `Idle`.
    #[must_use]
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Consumes the guard and returns its history.
    #[must_use]
    pub fn into_history(self) -> Vec<PipelineState> {
        self.history
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] and stays put if the move is not a legal
    /// forward step.
    pub fn advance(&mut self, next: PipelineState) -> Result<(), InvalidTransition> {
        if !self.current.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.current,
                to: next,
            });
        }
        self.current = next;
        self.history.push(next);
        Ok(())
    }
}
