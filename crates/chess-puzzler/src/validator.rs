//! Move validation against the puzzle script.
//!
//! A candidate matches when it is field-for-field the expected script move,
//! or when it is a legal move that reaches the same position the script
//! move would. The second test absorbs notation drift such as a missing or
//! differently cased promotion letter.

use chess_core::{CoordMove, RulesAdapter};
use serde::Serialize;
use shakmaty::{Color, Rank, Role, Square};
use tracing::{debug, error, warn};

use crate::error::PuzzleError;
use crate::events::SessionEvent;
use crate::session::{Phase, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum MoveVerdict {
    /// The move was the expected one and has been played.
    Accepted { completed: bool },
    /// Legal, but not the solution. Counted as a mistake.
    Wrong { mistakes: u32 },
    /// Rejected by the rules before any comparison. Not a mistake.
    Illegal,
    /// Nothing was compared: the player may not move right now.
    NotPlayersTurn,
}

impl MoveVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveVerdict::Accepted { .. })
    }
}

impl<R: RulesAdapter> Session<R> {
    /// Check a player move against the script and play it if it matches.
    ///
    /// Errors are reserved for broken puzzle data and internal defects.
    pub fn validate(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<MoveVerdict, PuzzleError> {
        if self.phase != Phase::AwaitingPlayerMove || !self.is_players_turn() {
            debug!(
                puzzle_id = %self.puzzle_id,
                phase = ?self.phase,
                cursor = self.cursor,
                "Move ignored outside the player's turn"
            );
            return Ok(MoveVerdict::NotPlayersTurn);
        }

        let promotion = promotion.or_else(|| self.default_promotion(from, to));
        let candidate = CoordMove::new(from, to, promotion);
        let expected = self.script.moves[self.cursor];

        let Ok(candidate_position) = self.rules.apply_move(&self.position, &candidate) else {
            debug!(puzzle_id = %self.puzzle_id, mv = %candidate, "Illegal move rejected");
            return Ok(MoveVerdict::Illegal);
        };

        let matches =
            candidate == expected || self.reaches_expected(&candidate_position, &expected)?;
        if !matches {
            self.mistakes += 1;
            self.events.push(SessionEvent::Mistake {
                count: self.mistakes,
            });
            debug!(
                puzzle_id = %self.puzzle_id,
                mv = %candidate,
                mistakes = self.mistakes,
                "Wrong move"
            );
            return Ok(MoveVerdict::Wrong {
                mistakes: self.mistakes,
            });
        }

        self.position = self.rules.apply_move(&self.position, &expected).map_err(|e| {
            error!(
                puzzle_id = %self.puzzle_id,
                mv = %expected,
                "Confirmed move rejected by rules: {e}"
            );
            PuzzleError::InvariantViolation(format!(
                "confirmed move {expected} rejected: {e}"
            ))
        })?;
        self.cursor += 1;
        self.clear_hint();
        self.push_position_event(Some(expected));

        if self.reached_end() {
            self.finish(true);
            Ok(MoveVerdict::Accepted { completed: true })
        } else {
            self.phase = Phase::SchedulingOpponentReply;
            Ok(MoveVerdict::Accepted { completed: false })
        }
    }

    /// Queen, when a pawn reaches the last rank and no piece was named.
    fn default_promotion(&self, from: Square, to: Square) -> Option<Role> {
        let piece = self.rules.piece_at(&self.position, from)?;
        let last_rank = match piece.color {
            Color::White => Rank::Eighth,
            Color::Black => Rank::First,
        };
        (piece.role == Role::Pawn && to.rank() == last_rank).then_some(Role::Queen)
    }

    fn reaches_expected(
        &self,
        candidate_position: &R::Position,
        expected: &CoordMove,
    ) -> Result<bool, PuzzleError> {
        let expected_position = self.rules.apply_move(&self.position, expected).map_err(|e| {
            warn!(puzzle_id = %self.puzzle_id, mv = %expected, "Script move is illegal");
            PuzzleError::malformed(&self.puzzle_id, format!("script move {expected}: {e}"))
        })?;
        Ok(self
            .rules
            .same_position(candidate_position, &expected_position))
    }
}
