//! Chess rules and move notation shared by the puzzle crates.

pub mod error;
pub mod notation;
pub mod rules;

pub use error::RulesError;
pub use notation::CoordMove;
pub use rules::{RulesAdapter, ShakmatyRules};

pub use shakmaty;
