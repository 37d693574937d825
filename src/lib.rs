//! Times Table Sprint - a timed true/false multiplication quiz
//!
//! Core modules:
//! - `quiz`: Deterministic round logic (equations, timer, scoring, state machine)
//! - `best_scores`: Best time per question-count tier
//! - `persistence`: Key-value storage backends (memory, file, LocalStorage)
//! - `settings`: Persisted player preferences
//! - `driver`: Fixed-step tick accumulator for native/event loops

pub mod best_scores;
pub mod driver;
pub mod persistence;
pub mod quiz;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use best_scores::{BestScoreRecord, BestScoreStore};
pub use quiz::{QuizError, QuizEvent, QuizPhase, RoundController};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Timer tick period in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 100;
    /// Play time added per tick (coupled to the tick period, not wall clock)
    pub const TICK_SECONDS: f64 = 0.1;
    /// Ticks per second of play time
    pub const TICKS_PER_SECOND: u32 = 10;

    /// Time added for each wrong guess
    pub const PENALTY_SECONDS: f64 = 0.5;

    /// Operands are drawn from [0, OPERAND_LIMIT)
    pub const OPERAND_LIMIT: u32 = 9;

    /// Countdown stage labels, shown one second apart
    pub const COUNTDOWN_STAGES: [&str; 4] = ["3", "2", "1", "GO!"];
    /// Ticks each countdown stage stays on screen
    pub const COUNTDOWN_STAGE_TICKS: u32 = TICKS_PER_SECOND;

    /// Ticks on the score page before the play-again control appears
    pub const PLAY_AGAIN_DELAY_TICKS: u32 = TICKS_PER_SECOND;

    /// Pixels the equation list scrolls per answered question
    pub const SCROLL_STEP_PX: u32 = 80;

    /// Supported question counts, in display/storage order
    pub const QUESTION_TIERS: [u32; 4] = [10, 25, 50, 99];
}

/// Whether `count` is one of the fixed question tiers
#[inline]
pub fn is_supported_tier(count: u32) -> bool {
    consts::QUESTION_TIERS.contains(&count)
}

/// Round a time to the one-decimal precision shown to players
#[inline]
pub fn round_tenths(seconds: f64) -> f64 {
    (seconds * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_tiers() {
        assert!(is_supported_tier(10));
        assert!(is_supported_tier(99));
        assert!(!is_supported_tier(0));
        assert!(!is_supported_tier(100));
    }

    #[test]
    fn test_round_tenths() {
        assert_eq!(round_tenths(6.54), 6.5);
        assert_eq!(round_tenths(0.1 + 0.2), 0.3);
        assert_eq!(round_tenths(7.0), 7.0);
    }
}
