//! Round assembly and the player's guess log

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::QuizError;
use super::equation::{Equation, EquationGenerator};

/// The shuffled equations for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    equations: Vec<Equation>,
}

impl Round {
    pub fn new(equations: Vec<Equation>) -> Self {
        Self { equations }
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn question_count(&self) -> usize {
        self.equations.len()
    }

    /// Number of statements that are actually true
    pub fn true_count(&self) -> usize {
        self.equations.iter().filter(|e| e.is_true()).count()
    }
}

/// Guesses in answer order, matched positionally against `Round::equations`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessLog {
    guesses: Vec<bool>,
}

impl GuessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, guess: bool) {
        self.guesses.push(guess);
    }

    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.guesses
    }

    pub fn clear(&mut self) {
        self.guesses.clear();
    }
}

impl From<Vec<bool>> for GuessLog {
    fn from(guesses: Vec<bool>) -> Self {
        Self { guesses }
    }
}

/// Builds rounds with a random true/false split
pub struct RoundBuilder<R: Rng> {
    generator: EquationGenerator<R>,
}

impl<R: Rng> RoundBuilder<R> {
    pub fn new(rng: R) -> Self {
        Self {
            generator: EquationGenerator::new(rng),
        }
    }

    /// Build a round of `question_count` equations.
    ///
    /// The true count is drawn from `[0, question_count)`, so a round is never
    /// all true.
    pub fn build(&mut self, question_count: usize) -> Result<Round, QuizError> {
        if question_count == 0 {
            return Err(QuizError::EmptyRound);
        }

        let true_count = self.generator.rng_mut().random_range(0..question_count);
        let false_count = question_count - true_count;

        let mut equations = Vec::with_capacity(question_count);
        equations.extend((0..true_count).map(|_| self.generator.generate(true)));
        equations.extend((0..false_count).map(|_| self.generator.generate(false)));
        equations.shuffle(self.generator.rng_mut());

        log::debug!(
            "Built round: {} questions, {} true, {} false",
            question_count,
            true_count,
            false_count
        );

        Ok(Round::new(equations))
    }
}
