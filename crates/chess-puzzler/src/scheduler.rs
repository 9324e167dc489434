//! Deferred, cancelable steps: the scripted opponent reply and each move of
//! solution playback.
//!
//! A [`Scheduler`] only decides *when* a step comes back to the session
//! owner. Whether it still applies is decided by [`Session::run_step`], which
//! compares the step's generation and cursor with the live session. A step
//! that fires twice, fires after a reset, or fires after playback took over is
//! dropped as stale.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chess_core::RulesAdapter;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::PuzzleError;
use crate::session::{Phase, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    OpponentReply,
    SolutionMove,
}

/// Token for one deferred move, stamped with the state it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduledStep {
    pub generation: u64,
    pub cursor: usize,
    pub kind: StepKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    /// Superseded by a reset, a new puzzle, playback, or an earlier copy of
    /// the same step. Nothing changed.
    Stale,
}

pub trait Scheduler: Send {
    /// Deliver `step` back to the session owner after `delay`.
    fn schedule(&mut self, step: ScheduledStep, delay: Duration);

    /// Drop everything not yet delivered.
    fn cancel_all(&mut self);
}

impl<R: RulesAdapter> Session<R> {
    /// The one step the current phase is waiting on, if any.
    pub fn next_step(&self) -> Option<ScheduledStep> {
        let kind = match self.phase {
            Phase::SchedulingOpponentReply => StepKind::OpponentReply,
            Phase::PlayingBackSolution => StepKind::SolutionMove,
            Phase::AwaitingPlayerMove | Phase::Complete => return None,
        };
        Some(ScheduledStep {
            generation: self.generation,
            cursor: self.cursor,
            kind,
        })
    }

    /// Run a deferred step if the session is still in the state it was
    /// issued for.
    pub fn run_step(&mut self, step: ScheduledStep) -> Result<StepOutcome, PuzzleError> {
        let expected_phase = match step.kind {
            StepKind::OpponentReply => Phase::SchedulingOpponentReply,
            StepKind::SolutionMove => Phase::PlayingBackSolution,
        };
        if step.generation != self.generation
            || step.cursor != self.cursor
            || self.phase != expected_phase
        {
            debug!(
                puzzle_id = %self.puzzle_id,
                step = ?step,
                generation = self.generation,
                cursor = self.cursor,
                phase = ?self.phase,
                "Dropping stale step"
            );
            return Ok(StepOutcome::Stale);
        }

        match step.kind {
            StepKind::OpponentReply => self.play_opponent_reply(),
            StepKind::SolutionMove => self.play_solution_move(),
        }
    }

    fn play_opponent_reply(&mut self) -> Result<StepOutcome, PuzzleError> {
        let reply = self.scripted_move_at_cursor()?;
        self.position = self.rules.apply_move(&self.position, &reply).map_err(|e| {
            warn!(puzzle_id = %self.puzzle_id, mv = %reply, "Scripted reply is illegal");
            PuzzleError::malformed(&self.puzzle_id, format!("scripted reply {reply}: {e}"))
        })?;
        self.cursor += 1;
        self.push_position_event(Some(reply));

        if self.reached_end() {
            self.finish(true);
        } else {
            self.phase = Phase::AwaitingPlayerMove;
        }
        Ok(StepOutcome::Applied)
    }

    pub(crate) fn scripted_move_at_cursor(&self) -> Result<chess_core::CoordMove, PuzzleError> {
        self.script.get(self.cursor).copied().ok_or_else(|| {
            error!(
                puzzle_id = %self.puzzle_id,
                cursor = self.cursor,
                phase = ?self.phase,
                "Step scheduled past the end of the script"
            );
            PuzzleError::InvariantViolation(format!(
                "no script move at cursor {} in phase {:?}",
                self.cursor, self.phase
            ))
        })
    }
}

/// Scheduler that only queues. The owner pops steps and runs them whenever it
/// likes, which makes every interleaving reproducible in tests.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<VecDeque<(ScheduledStep, Duration)>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest queued step.
    pub fn pop(&self) -> Option<ScheduledStep> {
        self.lock().pop_front().map(|(step, _)| step)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Queued steps with their requested delays, oldest first.
    pub fn pending(&self) -> Vec<(ScheduledStep, Duration)> {
        self.lock().iter().copied().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<(ScheduledStep, Duration)>> {
        // A panic while holding this lock cannot leave the queue half-written
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, step: ScheduledStep, delay: Duration) {
        self.lock().push_back((step, delay));
    }

    fn cancel_all(&mut self) {
        self.lock().clear();
    }
}

/// Scheduler backed by tokio timers. Steps come back on the receiver
/// returned from [`TokioScheduler::new`]; the session owner drains it.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<ScheduledStep>,
    pending: Vec<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScheduledStep>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: Vec::new(),
            },
            rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    /// Must be called from within a tokio runtime.
    fn schedule(&mut self, step: ScheduledStep, delay: Duration) {
        self.pending.retain(|handle| !handle.is_finished());
        let tx = self.tx.clone();
        self.pending.push(tokio::spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            // Receiver gone means the owner shut down
            let _ = tx.send(step);
        }));
    }

    fn cancel_all(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
