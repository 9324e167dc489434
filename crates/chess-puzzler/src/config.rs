//! Engine pacing configuration from environment variables

use std::env;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay before the scripted opponent reply. Zero means "next tick".
    pub opponent_reply_delay: Duration,

    /// Pause between moves during solution playback
    pub solution_step_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            opponent_reply_delay: Duration::ZERO,
            solution_step_interval: Duration::from_millis(400),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            opponent_reply_delay: env_millis("PUZZLE_OPPONENT_DELAY_MS")
                .unwrap_or(defaults.opponent_reply_delay),
            solution_step_interval: env_millis("PUZZLE_SOLUTION_STEP_MS")
                .unwrap_or(defaults.solution_step_interval),
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.opponent_reply_delay, Duration::ZERO);
        assert_eq!(config.solution_step_interval, Duration::from_millis(400));
    }

    #[test]
    fn test_env_millis_ignores_garbage() {
        // Unique keys so parallel tests never race on them
        env::set_var("CHESS_PUZZLER_TEST_MS_OK", "250");
        env::set_var("CHESS_PUZZLER_TEST_MS_BAD", "soon");
        assert_eq!(
            env_millis("CHESS_PUZZLER_TEST_MS_OK"),
            Some(Duration::from_millis(250))
        );
        assert_eq!(env_millis("CHESS_PUZZLER_TEST_MS_BAD"), None);
        assert_eq!(env_millis("CHESS_PUZZLER_TEST_MS_MISSING"), None);
    }
}
