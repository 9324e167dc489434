//! Engine error types

use chess_core::RulesError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// The puzzle data itself is broken. Retrying the same action will fail
    /// again; only loading another puzzle helps.
    #[error("Malformed puzzle {puzzle_id}: {reason}")]
    MalformedPuzzle { puzzle_id: String, reason: String },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl PuzzleError {
    pub(crate) fn malformed(puzzle_id: &str, reason: impl ToString) -> Self {
        PuzzleError::MalformedPuzzle {
            puzzle_id: puzzle_id.to_string(),
            reason: reason.to_string(),
        }
    }
}
