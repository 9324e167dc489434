#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chess_puzzler::chess_core::{CoordMove, ShakmatyRules};
use chess_puzzler::{
    AttemptRecord, AttemptSink, EngineConfig, ManualScheduler, Puzzle, PuzzleEngine,
    SessionObserver, StepOutcome,
};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Italian opening line played from the start position. After the setup move
/// the player has Black and must find e7e5, b8c6 and g8f6.
pub const ITALIAN_MOVES: &str = "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6";

/// Black to move; after `a8b8` White mates with `e7e8q`.
pub const PROMOTION_FEN: &str = "k7/4P3/1K6/8/8/8/8/8 b - - 0 1";

pub fn puzzle(id: &str, fen: &str, moves: &str) -> Puzzle {
    Puzzle {
        id: id.to_string(),
        fen: fen.to_string(),
        moves: moves.to_string(),
        rating: 1500,
        themes: Vec::new(),
    }
}

pub fn engine(puzzle: Puzzle) -> (PuzzleEngine<ShakmatyRules>, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let engine = PuzzleEngine::new(
        ShakmatyRules,
        EngineConfig::default(),
        puzzle,
        Box::new(scheduler.clone()),
    )
    .unwrap();
    (engine, scheduler)
}

/// Deliver queued steps until the scheduler runs dry. Returns how many were
/// applied.
pub fn pump(engine: &mut PuzzleEngine<ShakmatyRules>, scheduler: &ManualScheduler) -> usize {
    let mut applied = 0;
    while let Some(step) = scheduler.pop() {
        if engine.on_step(step).unwrap() == StepOutcome::Applied {
            applied += 1;
        }
    }
    applied
}

/// Observer that writes every callback into a shared log.
#[derive(Clone, Default)]
pub struct EventLog(pub Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }

    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }
}

impl SessionObserver for EventLog {
    fn on_position_changed(&mut self, fen: &str, last_move: Option<&CoordMove>) {
        let mv = last_move.map(|m| m.to_string()).unwrap_or_default();
        self.push(format!("position {mv} {fen}"));
    }

    fn on_hint_shown(&mut self, from: &str, to: Option<&str>) {
        self.push(format!("hint {from} {}", to.unwrap_or("-")));
    }

    fn on_hint_cleared(&mut self) {
        self.push("hint_cleared".to_string());
    }

    fn on_mistake(&mut self, count: u32) {
        self.push(format!("mistake {count}"));
    }

    fn on_complete(&mut self, is_solved: bool) {
        self.push(format!("complete {is_solved}"));
    }
}

/// Sink that keeps every record it is given.
#[derive(Clone, Default)]
pub struct RecordingSink(pub Arc<Mutex<Vec<AttemptRecord>>>);

impl RecordingSink {
    pub fn records(&self) -> Vec<AttemptRecord> {
        self.0.lock().unwrap().clone()
    }
}

impl AttemptSink for RecordingSink {
    fn record(&mut self, attempt: &AttemptRecord) {
        self.0.lock().unwrap().push(attempt.clone());
    }
}
