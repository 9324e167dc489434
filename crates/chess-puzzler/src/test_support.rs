//! Fixtures shared by the unit tests.

use crate::puzzle::Puzzle;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Black to move; after `a8b8` White mates with `e7e8q`.
pub const PROMOTION_FEN: &str = "k7/4P3/1K6/8/8/8/8/8 b - - 0 1";

pub fn puzzle(fen: &str, moves: &str) -> Puzzle {
    Puzzle {
        id: "test".to_string(),
        fen: fen.to_string(),
        moves: moves.to_string(),
        rating: 1500,
        themes: Vec::new(),
    }
}
