/// Puzzle script: the setup move followed by the moves the player works through

use chess_core::{CoordMove, RulesError};

pub type ScriptMove = CoordMove;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Played automatically before the player acts
    pub setup: ScriptMove,
    /// Player moves at even indices, scripted replies at odd indices
    pub moves: Vec<ScriptMove>,
}

impl Script {
    /// Parse a space-separated move list. The first token is the setup move.
    pub fn parse(moves: &str) -> Result<Self, RulesError> {
        let mut tokens = moves.split_whitespace();
        let setup = tokens
            .next()
            .ok_or_else(|| RulesError::InvalidToken(moves.to_string()))
            .and_then(CoordMove::parse)?;
        let moves = tokens.map(CoordMove::parse).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { setup, moves })
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScriptMove> {
        self.moves.get(index)
    }

    /// Number of player moves: ceil(len / 2).
    pub fn mate_in(&self) -> usize {
        self.moves.len().div_ceil(2)
    }
}
