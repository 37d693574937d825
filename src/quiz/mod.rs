//! Deterministic quiz module
//!
//! All round logic lives here. This module must stay pure:
//! - Fixed tick quantum only (no wall clock)
//! - Injected/seeded RNG only
//! - No rendering or platform dependencies

pub mod controller;
pub mod equation;
pub mod round;
pub mod score;
pub mod timer;

pub use controller::{QuizEvent, QuizPhase, RoundController};
pub use equation::{Equation, EquationGenerator, Falsification};
pub use round::{GuessLog, Round, RoundBuilder};
pub use score::{ScoreEvaluator, ScoreResult, format_seconds};
pub use timer::PlayTimer;

/// Errors raised by round construction and scoring
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("question count must be greater than zero")]
    EmptyRound,

    #[error("{guesses} guesses recorded for a round of {equations} equations")]
    GuessCountMismatch { guesses: usize, equations: usize },
}
