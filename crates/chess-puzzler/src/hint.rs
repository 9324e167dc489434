//! Hints derived from the next expected script move.

use chess_core::RulesAdapter;
use shakmaty::Square;
use tracing::debug;

use crate::events::SessionEvent;
use crate::session::{Phase, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// Origin and destination of the next move
    Move,
    /// Only the piece to move
    Piece,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintDescriptor {
    pub from: Square,
    pub to: Option<Square>,
}

impl<R: RulesAdapter> Session<R> {
    /// Plan a hint for the player's next move without touching the session.
    pub fn plan_hint(&self, kind: HintKind) -> Option<HintDescriptor> {
        if self.phase != Phase::AwaitingPlayerMove || !self.is_players_turn() {
            return None;
        }
        let next = self.script.get(self.cursor)?;
        Some(match kind {
            HintKind::Move => HintDescriptor {
                from: next.from,
                to: Some(next.to),
            },
            HintKind::Piece => HintDescriptor {
                from: next.from,
                to: None,
            },
        })
    }

    /// Plan a hint and mark it as shown until the next accepted move.
    pub fn show_hint(&mut self, kind: HintKind) -> Option<HintDescriptor> {
        let hint = self.plan_hint(kind)?;
        debug!(puzzle_id = %self.puzzle_id, kind = ?kind, cursor = self.cursor, "Hint shown");
        self.active_hint = Some(hint);
        self.events.push(SessionEvent::hint_shown(&hint));
        Some(hint)
    }
}
