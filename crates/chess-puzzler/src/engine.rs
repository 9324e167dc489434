//! Puzzle engine: single owner of the live session.
//!
//! Every caller action and every delivered step goes through here. After each
//! one the engine schedules whatever step the session now waits on, forwards
//! queued events to the observer, and reports a finished attempt once.

use std::time::Duration;

use chess_core::{CoordMove, RulesAdapter};
use shakmaty::{Role, Square};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::PuzzleError;
use crate::events::SessionObserver;
use crate::hint::{HintDescriptor, HintKind};
use crate::progress::{AttemptSink, Progress};
use crate::puzzle::Puzzle;
use crate::scheduler::{ScheduledStep, Scheduler, StepKind, StepOutcome};
use crate::session::{Phase, Session};
use crate::validator::MoveVerdict;

pub struct PuzzleEngine<R: RulesAdapter> {
    rules: R,
    config: EngineConfig,
    puzzle: Puzzle,
    session: Session<R>,
    generation: u64,
    scheduler: Box<dyn Scheduler>,
    observer: Box<dyn SessionObserver>,
    telemetry: Box<dyn AttemptSink>,
}

impl<R: RulesAdapter> PuzzleEngine<R> {
    pub fn new(
        rules: R,
        config: EngineConfig,
        puzzle: Puzzle,
        scheduler: Box<dyn Scheduler>,
    ) -> Result<Self, PuzzleError> {
        let generation = 1;
        let session = Session::new(rules.clone(), &puzzle, generation)?;
        Ok(Self {
            rules,
            config,
            puzzle,
            session,
            generation,
            scheduler,
            observer: Box::new(()),
            telemetry: Box::new(()),
        })
    }

    /// Attach an observer. Events queued so far are delivered right away.
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self.flush();
        self
    }

    pub fn with_telemetry(mut self, telemetry: Box<dyn AttemptSink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn progress(&self) -> Progress {
        self.session.progress()
    }

    /// Replace the session with a fresh attempt at `puzzle`. On failure the
    /// current session keeps running untouched.
    pub fn load(&mut self, puzzle: Puzzle) -> Result<(), PuzzleError> {
        let generation = self.generation + 1;
        let session = Session::new(self.rules.clone(), &puzzle, generation)?;

        self.scheduler.cancel_all();
        self.generation = generation;
        self.session = session;
        self.puzzle = puzzle;
        info!(puzzle_id = %self.puzzle.id, generation, "Puzzle loaded");
        self.flush();
        Ok(())
    }

    /// Start the current puzzle over. Mistakes and progress are not kept.
    pub fn reset(&mut self) -> Result<(), PuzzleError> {
        self.load(self.puzzle.clone())
    }

    pub fn submit_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<MoveVerdict, PuzzleError> {
        let verdict = self.session.validate(from, to, promotion);
        if let Ok(MoveVerdict::Accepted { .. }) = verdict {
            self.schedule_next();
        }
        self.flush();
        verdict
    }

    /// [`PuzzleEngine::submit_move`] for a coordinate token such as `e7e8q`.
    pub fn submit_uci(&mut self, token: &str) -> Result<MoveVerdict, PuzzleError> {
        let mv = CoordMove::parse(token)?;
        self.submit_move(mv.from, mv.to, mv.promotion)
    }

    pub fn hint(&mut self, kind: HintKind) -> Option<HintDescriptor> {
        let hint = self.session.show_hint(kind);
        self.flush();
        hint
    }

    /// Abandon the attempt and replay the full solution at the configured
    /// pace. Any pending opponent reply or earlier playback is cancelled.
    pub fn play_solution(&mut self) {
        self.scheduler.cancel_all();
        self.generation += 1;
        self.session.start_solution(self.generation);
        self.schedule_next();
        self.flush();
    }

    /// Entry point for steps coming back from the scheduler.
    pub fn on_step(&mut self, step: ScheduledStep) -> Result<StepOutcome, PuzzleError> {
        let outcome = self.session.run_step(step);
        if let Ok(StepOutcome::Applied) = outcome {
            self.schedule_next();
        }
        self.flush();
        outcome
    }

    fn schedule_next(&mut self) {
        if let Some(step) = self.session.next_step() {
            self.scheduler.schedule(step, self.delay_for(step.kind));
        }
    }

    fn delay_for(&self, kind: StepKind) -> Duration {
        match kind {
            StepKind::OpponentReply => self.config.opponent_reply_delay,
            StepKind::SolutionMove => self.config.solution_step_interval,
        }
    }

    fn flush(&mut self) {
        for event in self.session.drain_events() {
            event.dispatch(self.observer.as_mut());
        }
        if self.session.phase() == Phase::Complete {
            self.scheduler.cancel_all();
            if let Some(attempt) = self.session.take_attempt_record() {
                info!(
                    puzzle_id = %attempt.puzzle_id,
                    success = attempt.success,
                    time_ms = attempt.time_ms,
                    "Reporting attempt"
                );
                self.telemetry.record(&attempt);
            }
        }
    }
}
