//! Rules adapter: the only place that knows how to apply chess moves.
//!
//! Positions are values. Applying a move never touches the position handed
//! in; it returns a fresh one or an error.

use std::fmt::Debug;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Piece, Position, Square};

use crate::error::RulesError;
use crate::notation::CoordMove;

pub trait RulesAdapter: Clone + Send + 'static {
    type Position: Clone + Debug + Send + 'static;

    fn parse_position(&self, fen: &str) -> Result<Self::Position, RulesError>;

    fn serialize_position(&self, pos: &Self::Position) -> String;

    /// Apply `mv` to a copy of `pos`. Fails if the move is not legal.
    fn apply_move(&self, pos: &Self::Position, mv: &CoordMove)
        -> Result<Self::Position, RulesError>;

    fn is_checkmate(&self, pos: &Self::Position) -> bool;

    fn side_to_move(&self, pos: &Self::Position) -> Color;

    fn piece_at(&self, pos: &Self::Position, square: Square) -> Option<Piece>;

    /// Whether two positions are the same board state.
    fn same_position(&self, a: &Self::Position, b: &Self::Position) -> bool {
        self.serialize_position(a) == self.serialize_position(b)
    }
}

/// Standard chess via shakmaty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl RulesAdapter for ShakmatyRules {
    type Position = Chess;

    fn parse_position(&self, fen: &str) -> Result<Chess, RulesError> {
        let parsed: Fen = fen.parse().map_err(|e| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{e}"),
        })?;
        parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| RulesError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{e}"),
            })
    }

    fn serialize_position(&self, pos: &Chess) -> String {
        Fen::from_position(pos, EnPassantMode::Legal).to_string()
    }

    fn apply_move(&self, pos: &Chess, mv: &CoordMove) -> Result<Chess, RulesError> {
        let illegal = || RulesError::IllegalMove {
            mv: mv.to_string(),
            fen: self.serialize_position(pos),
        };

        let uci = UciMove::Normal {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        };
        let m = uci.to_move(pos).map_err(|_| illegal())?;
        if !pos.is_legal(m.clone()) {
            return Err(illegal());
        }

        let mut next = pos.clone();
        next.play_unchecked(m);
        Ok(next)
    }

    fn is_checkmate(&self, pos: &Chess) -> bool {
        pos.is_checkmate()
    }

    fn side_to_move(&self, pos: &Chess) -> Color {
        pos.turn()
    }

    fn piece_at(&self, pos: &Chess, square: Square) -> Option<Piece> {
        pos.board().piece_at(square)
    }
}
