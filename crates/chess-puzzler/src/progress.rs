//! Progress and attempt telemetry derived from a session.

use chess_core::RulesAdapter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{Phase, Session};

/// Snapshot of where an attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub phase: Phase,
    pub cursor: usize,
    pub mistakes: u32,
    pub moves_tried: u32,
    pub mate_in: usize,
    /// Zero until the session completes
    pub elapsed_ms: u64,
    pub is_solved: bool,
}

/// Final outcome of a completed attempt, handed to telemetry once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub puzzle_id: String,
    pub success: bool,
    pub moves_tried: u32,
    pub time_ms: u64,
    pub mistakes: u32,
    pub completed_at: DateTime<Utc>,
}

/// Moves and mistakes counted toward an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tally {
    pub moves_tried: u32,
    pub mistakes: u32,
}

pub trait AttemptSink: Send {
    fn record(&mut self, attempt: &AttemptRecord);
}

/// Sink that drops every record.
impl AttemptSink for () {
    fn record(&mut self, _attempt: &AttemptRecord) {}
}

impl<R: RulesAdapter> Session<R> {
    pub fn moves_tried(&self) -> u32 {
        self.cursor as u32 + self.mistakes
    }

    pub(crate) fn tally(&self) -> Tally {
        Tally {
            moves_tried: self.moves_tried(),
            mistakes: self.mistakes,
        }
    }

    /// Time from session start to completion. Zero while still in progress.
    pub fn elapsed_ms(&self) -> u64 {
        if self.phase != Phase::Complete {
            return 0;
        }
        self.completed_at
            .map(|done| done.duration_since(self.started_at).as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            phase: self.phase,
            cursor: self.cursor,
            mistakes: self.mistakes,
            moves_tried: self.moves_tried(),
            mate_in: self.mate_in,
            elapsed_ms: self.elapsed_ms(),
            is_solved: self.phase == Phase::Complete && self.is_solved,
        }
    }

    /// The attempt record, the first time it is asked for after completion.
    /// After solution playback it carries the tally from when the player
    /// gave up, and never counts as a success.
    pub fn take_attempt_record(&mut self) -> Option<AttemptRecord> {
        if self.phase != Phase::Complete || self.attempt_reported {
            return None;
        }
        self.attempt_reported = true;
        // A watched solution is not a solve
        let (success, tally) = match self.given_up {
            Some(tally) => (false, tally),
            None => (self.is_solved, self.tally()),
        };
        Some(AttemptRecord {
            puzzle_id: self.puzzle_id.clone(),
            success,
            moves_tried: tally.moves_tried,
            time_ms: self.elapsed_ms(),
            mistakes: tally.mistakes,
            completed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{puzzle, PROMOTION_FEN};
    use chess_core::ShakmatyRules;
    use shakmaty::Square;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_counts_until_completion() {
        let mut session =
            Session::new(ShakmatyRules, &puzzle(PROMOTION_FEN, "a8b8 e7e8q"), 0).unwrap();
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(session.elapsed_ms(), 0);

        session.validate(Square::B6, Square::C6, None).unwrap();
        session.validate(Square::E7, Square::E8, None).unwrap();
        tokio::time::advance(Duration::from_millis(5000)).await;

        let progress = session.progress();
        assert_eq!(progress.phase, Phase::Complete);
        assert_eq!(progress.elapsed_ms, 1500);
        assert_eq!(progress.moves_tried, 2);
        assert!(progress.is_solved);
    }

    #[test]
    fn test_attempt_record_taken_once() {
        let mut session =
            Session::new(ShakmatyRules, &puzzle(PROMOTION_FEN, "a8b8 e7e8q"), 0).unwrap();
        assert!(session.take_attempt_record().is_none());

        session.validate(Square::E7, Square::E8, None).unwrap();
        let record = session.take_attempt_record().unwrap();
        assert_eq!(record.puzzle_id, "test");
        assert!(record.success);
        assert_eq!(record.mistakes, 0);
        assert_eq!(record.moves_tried, 1);

        assert!(session.take_attempt_record().is_none());
    }

    #[test]
    fn test_watched_solution_reports_player_tally() {
        let mut session =
            Session::new(ShakmatyRules, &puzzle(PROMOTION_FEN, "a8b8 e7e8q"), 0).unwrap();
        session.validate(Square::B6, Square::C6, None).unwrap();
        session.validate(Square::B6, Square::B5, None).unwrap();

        session.start_solution(1);
        let step = session.next_step().unwrap();
        session.run_step(step).unwrap();
        assert_eq!(session.phase(), Phase::Complete);
        assert!(session.is_solved());

        let record = session.take_attempt_record().unwrap();
        assert!(!record.success);
        assert_eq!(record.mistakes, 2);
        assert_eq!(record.moves_tried, 2);
    }
}
