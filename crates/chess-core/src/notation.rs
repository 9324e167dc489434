//! Coordinate move notation (`e2e4`, `e7e8q`) as used by puzzle move lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shakmaty::{File, Rank, Role, Square};

use crate::error::RulesError;

/// A move given by its origin and destination squares, plus the piece a pawn
/// promotes to when it reaches the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl CoordMove {
    pub fn new(from: Square, to: Square, promotion: Option<Role>) -> Self {
        Self { from, to, promotion }
    }

    /// Parse a `<from><to>[promotion]` token. The promotion letter may be
    /// either case.
    pub fn parse(token: &str) -> Result<Self, RulesError> {
        let bytes = token.as_bytes();
        if bytes.len() != 4 && bytes.len() != 5 {
            return Err(RulesError::InvalidToken(token.to_string()));
        }

        let from = parse_square(bytes[0], bytes[1])
            .ok_or_else(|| RulesError::InvalidToken(token.to_string()))?;
        let to = parse_square(bytes[2], bytes[3])
            .ok_or_else(|| RulesError::InvalidToken(token.to_string()))?;

        let promotion = match bytes.get(4) {
            None => None,
            Some(&c) => Some(
                promotion_role(c).ok_or_else(|| RulesError::InvalidToken(token.to_string()))?,
            ),
        };

        Ok(Self { from, to, promotion })
    }
}

fn parse_square(file: u8, rank: u8) -> Option<Square> {
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(Square::from_coords(
        File::new(u32::from(file - b'a')),
        Rank::new(u32::from(rank - b'1')),
    ))
}

fn promotion_role(c: u8) -> Option<Role> {
    match c {
        b'q' | b'Q' => Some(Role::Queen),
        b'r' | b'R' => Some(Role::Rook),
        b'b' | b'B' => Some(Role::Bishop),
        b'n' | b'N' => Some(Role::Knight),
        _ => None,
    }
}

fn promotion_char(role: Role) -> char {
    match role {
        Role::Queen => 'q',
        Role::Rook => 'r',
        Role::Bishop => 'b',
        Role::Knight => 'n',
        Role::King => 'k',
        Role::Pawn => 'p',
    }
}

impl fmt::Display for CoordMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", promotion_char(role))?;
        }
        Ok(())
    }
}

impl FromStr for CoordMove {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CoordMove {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CoordMove {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse(&token).map_err(serde::de::Error::custom)
    }
}
