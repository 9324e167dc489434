//! Puzzle records as delivered by the puzzle source, and their theme tags

pub mod script;

use serde::{Deserialize, Serialize};

/// Themes the engine acts on. Other theme strings stay in
/// [`Puzzle::themes`] untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagKind {
    Mate,
    MateIn1,
    MateIn2,
    MateIn3,
    MateIn4,
    MateIn5,
    Promotion,
    UnderPromotion,
}

impl TagKind {
    /// Look up a theme by its wire name (`"fork"`, `"mateIn2"`, ...).
    pub fn from_theme(theme: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(theme.to_string())).ok()
    }

    /// N for the `mateInN` themes.
    pub fn mate_depth(self) -> Option<usize> {
        match self {
            TagKind::MateIn1 => Some(1),
            TagKind::MateIn2 => Some(2),
            TagKind::MateIn3 => Some(3),
            TagKind::MateIn4 => Some(4),
            TagKind::MateIn5 => Some(5),
            _ => None,
        }
    }
}

/// A puzzle record: starting FEN plus the full move list, setup move first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    /// Position before the setup move
    pub fen: String,
    /// Space-separated coordinate moves: `"e2e4 e7e5 g1f3"`
    pub moves: String,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl Puzzle {
    /// Themes this engine recognises. Unknown theme strings are skipped.
    pub fn tags(&self) -> Vec<TagKind> {
        self.themes
            .iter()
            .filter_map(|t| TagKind::from_theme(t))
            .collect()
    }

    /// Mate depth advertised by the puzzle's themes, if any.
    pub fn advertised_mate_depth(&self) -> Option<usize> {
        self.tags().into_iter().find_map(TagKind::mate_depth)
    }
}
