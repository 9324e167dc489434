//! Engine → UI notifications.
//!
//! The session queues events as it changes state; the engine drains the queue
//! after every operation and hands each event to a [`SessionObserver`].

use chess_core::CoordMove;
use serde::Serialize;

use crate::hint::HintDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    PositionChanged {
        fen: String,
        last_move: Option<CoordMove>,
    },
    HintShown {
        from: String,
        to: Option<String>,
    },
    HintCleared,
    Mistake {
        count: u32,
    },
    Complete {
        is_solved: bool,
    },
}

impl SessionEvent {
    pub(crate) fn hint_shown(hint: &HintDescriptor) -> Self {
        SessionEvent::HintShown {
            from: hint.from.to_string(),
            to: hint.to.map(|sq| sq.to_string()),
        }
    }

    pub fn dispatch(&self, observer: &mut dyn SessionObserver) {
        match self {
            SessionEvent::PositionChanged { fen, last_move } => {
                observer.on_position_changed(fen, last_move.as_ref())
            }
            SessionEvent::HintShown { from, to } => observer.on_hint_shown(from, to.as_deref()),
            SessionEvent::HintCleared => observer.on_hint_cleared(),
            SessionEvent::Mistake { count } => observer.on_mistake(*count),
            SessionEvent::Complete { is_solved } => observer.on_complete(*is_solved),
        }
    }
}

/// Observation callbacks. Every method defaults to doing nothing.
pub trait SessionObserver: Send {
    fn on_position_changed(&mut self, _fen: &str, _last_move: Option<&CoordMove>) {}

    fn on_hint_shown(&mut self, _from: &str, _to: Option<&str>) {}

    fn on_hint_cleared(&mut self) {}

    fn on_mistake(&mut self, _count: u32) {}

    fn on_complete(&mut self, _is_solved: bool) {}
}

/// Observer that ignores everything.
impl SessionObserver for () {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        mistakes: Vec<u32>,
        completed: Option<bool>,
    }

    impl SessionObserver for Counter {
        fn on_mistake(&mut self, count: u32) {
            self.mistakes.push(count);
        }

        fn on_complete(&mut self, is_solved: bool) {
            self.completed = Some(is_solved);
        }
    }

    #[test]
    fn test_dispatch_routes_by_variant() {
        let mut counter = Counter::default();
        SessionEvent::Mistake { count: 1 }.dispatch(&mut counter);
        SessionEvent::HintCleared.dispatch(&mut counter);
        SessionEvent::Mistake { count: 2 }.dispatch(&mut counter);
        SessionEvent::Complete { is_solved: true }.dispatch(&mut counter);

        assert_eq!(counter.mistakes, vec![1, 2]);
        assert_eq!(counter.completed, Some(true));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(SessionEvent::PositionChanged {
            fen: "8/8/8/8/8/8/8/8 w - - 0 1".into(),
            last_move: Some(CoordMove::parse("e7e8q").unwrap()),
        })
        .unwrap();
        assert_eq!(json["type"], "position_changed");
        assert_eq!(json["last_move"], "e7e8q");

        let json = serde_json::to_value(SessionEvent::HintShown {
            from: "e2".into(),
            to: None,
        })
        .unwrap();
        assert_eq!(json["type"], "hint_shown");
        assert!(json["to"].is_null());
    }
}
