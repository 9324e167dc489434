use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Invalid move token '{0}'")]
    InvalidToken(String),

    #[error("Illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },
}
