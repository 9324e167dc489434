//! Puzzle solving engine.
//!
//! Drives a player through a scripted tactical puzzle: checks each player
//! move against the solution, plays the scripted replies on a deferred tick,
//! offers hints, and can replay the full solution. All of it runs off one
//! [`session::Phase`] per attempt, so a deferred step can always tell whether
//! it still applies.

pub use chess_core;

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod hint;
pub mod progress;
pub mod puzzle;
pub mod scheduler;
pub mod session;
pub mod solution;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use config::EngineConfig;
pub use engine::PuzzleEngine;
pub use error::PuzzleError;
pub use events::{SessionEvent, SessionObserver};
pub use hint::{HintDescriptor, HintKind};
pub use progress::{AttemptRecord, AttemptSink, Progress};
pub use puzzle::{Puzzle, TagKind};
pub use scheduler::{ManualScheduler, ScheduledStep, Scheduler, StepKind, StepOutcome, TokioScheduler};
pub use session::{Phase, Session};
pub use validator::MoveVerdict;
