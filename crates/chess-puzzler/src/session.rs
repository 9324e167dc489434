//! Puzzle session: the mutable record of one attempt at one puzzle.
//!
//! `phase` is the only source of truth for who may act next. The validator,
//! the turn scheduler and the solution player all check it before touching
//! the position, and deferred steps re-check it when they fire.

use chess_core::{CoordMove, RulesAdapter};
use serde::Serialize;
use shakmaty::Color;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::PuzzleError;
use crate::events::SessionEvent;
use crate::hint::HintDescriptor;
use crate::progress::Tally;
use crate::puzzle::script::Script;
use crate::puzzle::Puzzle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingPlayerMove,
    SchedulingOpponentReply,
    PlayingBackSolution,
    Complete,
}

pub struct Session<R: RulesAdapter> {
    pub(crate) rules: R,
    pub(crate) puzzle_id: String,
    /// Position after the setup move; solution playback rewinds to it
    pub(crate) start_position: R::Position,
    pub(crate) position: R::Position,
    pub(crate) script: Script,
    /// Script moves applied since the setup move
    pub(crate) cursor: usize,
    pub(crate) mistakes: u32,
    pub(crate) phase: Phase,
    pub(crate) mating_side: Color,
    pub(crate) mate_in: usize,
    pub(crate) is_solved: bool,
    /// Stamped on every deferred step; a mismatch means the step is stale
    pub(crate) generation: u64,
    pub(crate) active_hint: Option<HintDescriptor>,
    pub(crate) started_at: Instant,
    pub(crate) completed_at: Option<Instant>,
    pub(crate) attempt_reported: bool,
    /// Player's tally at the moment they asked for the solution
    pub(crate) given_up: Option<Tally>,
    pub(crate) events: Vec<SessionEvent>,
}

impl<R: RulesAdapter> Session<R> {
    /// Start an attempt: parse the script, play the setup move, and hand the
    /// resulting position to the player.
    ///
    /// Any failure here is a data problem with the puzzle, never a user error.
    pub fn new(rules: R, puzzle: &Puzzle, generation: u64) -> Result<Self, PuzzleError> {
        let script = Script::parse(&puzzle.moves)
            .map_err(|e| PuzzleError::malformed(&puzzle.id, e))?;
        let initial = rules
            .parse_position(&puzzle.fen)
            .map_err(|e| PuzzleError::malformed(&puzzle.id, e))?;
        let start_position = rules.apply_move(&initial, &script.setup).map_err(|e| {
            warn!(puzzle_id = %puzzle.id, setup = %script.setup, "Setup move rejected");
            PuzzleError::malformed(&puzzle.id, format!("setup move: {e}"))
        })?;

        let mating_side = rules.side_to_move(&start_position);
        let mate_in = script.mate_in();
        if let Some(advertised) = puzzle.advertised_mate_depth() {
            if advertised != mate_in {
                warn!(
                    puzzle_id = %puzzle.id,
                    advertised,
                    mate_in,
                    "Puzzle theme disagrees with script length"
                );
            }
        }

        let mut session = Self {
            position: start_position.clone(),
            start_position,
            rules,
            puzzle_id: puzzle.id.clone(),
            script,
            cursor: 0,
            mistakes: 0,
            phase: Phase::AwaitingPlayerMove,
            mating_side,
            mate_in,
            is_solved: false,
            generation,
            active_hint: None,
            started_at: Instant::now(),
            completed_at: None,
            attempt_reported: false,
            given_up: None,
            events: Vec::new(),
        };
        let setup = session.script.setup;
        session.push_position_event(Some(setup));

        if session.reached_end() {
            // Nothing left for the player to do. Not an attempt worth reporting.
            session.finish(false);
            session.attempt_reported = true;
        } else {
            info!(
                puzzle_id = %session.puzzle_id,
                mate_in,
                mating_side = ?mating_side,
                "Puzzle session started"
            );
        }

        Ok(session)
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn mating_side(&self) -> Color {
        self.mating_side
    }

    pub fn mate_in(&self) -> usize {
        self.mate_in
    }

    /// Only meaningful once the phase is `Complete`.
    pub fn is_solved(&self) -> bool {
        self.is_solved
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn position(&self) -> &R::Position {
        &self.position
    }

    pub fn fen(&self) -> String {
        self.rules.serialize_position(&self.position)
    }

    pub fn active_hint(&self) -> Option<HintDescriptor> {
        self.active_hint
    }

    /// Even cursor: the player's move. Odd: the scripted reply.
    pub fn is_players_turn(&self) -> bool {
        self.cursor % 2 == 0 && self.cursor < self.script.len()
    }

    /// Events queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn reached_end(&self) -> bool {
        self.cursor >= self.script.len() || self.rules.is_checkmate(&self.position)
    }

    pub(crate) fn finish(&mut self, solved: bool) {
        self.phase = Phase::Complete;
        self.is_solved = solved;
        self.completed_at.get_or_insert_with(Instant::now);
        self.events.push(SessionEvent::Complete { is_solved: solved });
        info!(
            puzzle_id = %self.puzzle_id,
            solved,
            mistakes = self.mistakes,
            "Puzzle session complete"
        );
    }

    pub(crate) fn clear_hint(&mut self) {
        if self.active_hint.take().is_some() {
            self.events.push(SessionEvent::HintCleared);
        }
    }

    pub(crate) fn push_position_event(&mut self, last_move: Option<CoordMove>) {
        let fen = self.rules.serialize_position(&self.position);
        self.events.push(SessionEvent::PositionChanged { fen, last_move });
    }
}
