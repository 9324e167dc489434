//! Solution playback: rewind to the position after the setup move and replay
//! the whole script, one deferred step per move.
//!
//! Interrupting playback is the same as starting over; there is no resume.
//! Asking for the solution before finishing counts as giving up: the attempt
//! is reported with the player's own tally, not the replay's.

use chess_core::RulesAdapter;
use tracing::{debug, info, warn};

use crate::error::PuzzleError;
use crate::scheduler::StepOutcome;
use crate::session::{Phase, Session};

impl<R: RulesAdapter> Session<R> {
    /// Switch to playback under a fresh `generation`, invalidating every step
    /// issued before. The first move is available from [`Session::next_step`].
    pub fn start_solution(&mut self, generation: u64) {
        self.generation = generation;
        if self.script.is_empty() || self.rules.is_checkmate(&self.start_position) {
            debug!(puzzle_id = %self.puzzle_id, "Nothing to play back");
            return;
        }
        if self.phase != Phase::Complete && self.given_up.is_none() {
            self.given_up = Some(self.tally());
        }

        self.position = self.start_position.clone();
        self.cursor = 0;
        self.mistakes = 0;
        self.is_solved = false;
        self.clear_hint();
        self.phase = Phase::PlayingBackSolution;
        let setup = self.script.setup;
        self.push_position_event(Some(setup));
        info!(
            puzzle_id = %self.puzzle_id,
            moves = self.script.len(),
            "Solution playback started"
        );
    }

    pub(crate) fn play_solution_move(&mut self) -> Result<StepOutcome, PuzzleError> {
        let mv = self.scripted_move_at_cursor()?;
        self.position = self.rules.apply_move(&self.position, &mv).map_err(|e| {
            warn!(puzzle_id = %self.puzzle_id, mv = %mv, "Solution move is illegal");
            PuzzleError::malformed(&self.puzzle_id, format!("solution move {mv}: {e}"))
        })?;
        self.cursor += 1;
        self.push_position_event(Some(mv));

        if self.reached_end() {
            self.finish(true);
        }
        Ok(StepOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::StepKind;
    use crate::test_support::{puzzle, START_FEN};
    use chess_core::ShakmatyRules;
    use shakmaty::Square;

    const FINAL_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

    fn opening() -> Session<ShakmatyRules> {
        Session::new(
            ShakmatyRules,
            &puzzle(START_FEN, "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6"),
            1,
        )
        .unwrap()
    }

    fn play_out(session: &mut Session<ShakmatyRules>) -> usize {
        let mut applied = 0;
        while let Some(step) = session.next_step() {
            assert_eq!(step.kind, StepKind::SolutionMove);
            assert_eq!(session.run_step(step).unwrap(), StepOutcome::Applied);
            applied += 1;
        }
        applied
    }

    #[test]
    fn test_playback_replays_whole_script() {
        let mut session = opening();
        session.start_solution(2);
        assert_eq!(session.phase(), Phase::PlayingBackSolution);

        assert_eq!(play_out(&mut session), 5);
        assert_eq!(session.phase(), Phase::Complete);
        assert!(session.is_solved());
        assert_eq!(session.cursor(), 5);
        assert_eq!(session.fen(), FINAL_FEN);
    }

    #[test]
    fn test_playback_rewinds_progress() {
        let mut session = opening();
        session.validate(Square::D7, Square::D6, None).unwrap();
        session.validate(Square::E7, Square::E5, None).unwrap();
        assert_eq!(session.mistakes(), 1);

        session.start_solution(2);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.mistakes(), 0);
        assert_eq!(
            session.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_pending_reply_not_applied_twice() {
        let mut session = opening();
        session.validate(Square::E7, Square::E5, None).unwrap();
        let pending_reply = session.next_step().unwrap();

        session.start_solution(2);
        assert_eq!(session.run_step(pending_reply).unwrap(), StepOutcome::Stale);
        assert_eq!(session.cursor(), 0);

        assert_eq!(play_out(&mut session), 5);
        assert_eq!(session.fen(), FINAL_FEN);
    }

    #[test]
    fn test_player_locked_out_during_playback() {
        let mut session = opening();
        session.start_solution(2);

        let verdict = session.validate(Square::E7, Square::E5, None).unwrap();
        assert_eq!(verdict, crate::validator::MoveVerdict::NotPlayersTurn);
        assert_eq!(session.plan_hint(crate::hint::HintKind::Move), None);
    }

    #[test]
    fn test_restarted_playback_drops_old_steps() {
        let mut session = opening();
        session.start_solution(2);
        let first = session.next_step().unwrap();
        session.run_step(first).unwrap();
        let second = session.next_step().unwrap();

        session.start_solution(3);
        assert_eq!(session.run_step(second).unwrap(), StepOutcome::Stale);
        assert_eq!(session.cursor(), 0);
        assert_eq!(play_out(&mut session), 5);
    }

    #[test]
    fn test_illegal_playback_move_keeps_phase() {
        // g1g3 is not a knight move
        let mut session =
            Session::new(ShakmatyRules, &puzzle(START_FEN, "e2e4 e7e5 g1g3 b8c6"), 1).unwrap();
        session.start_solution(2);
        let first = session.next_step().unwrap();
        assert_eq!(session.run_step(first).unwrap(), StepOutcome::Applied);

        let second = session.next_step().unwrap();
        let err = session.run_step(second).unwrap_err();
        assert!(matches!(err, PuzzleError::MalformedPuzzle { .. }));
        assert_eq!(session.phase(), Phase::PlayingBackSolution);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_degenerate_session_not_played_back() {
        let mut session = Session::new(ShakmatyRules, &puzzle(START_FEN, "e2e4"), 1).unwrap();
        session.drain_events();

        session.start_solution(2);
        assert_eq!(session.phase(), Phase::Complete);
        assert!(!session.is_solved());
        assert_eq!(session.next_step(), None);
        assert!(session.drain_events().is_empty());
    }
}
