//! Scoring: penalties for wrong guesses on top of play time

use serde::{Deserialize, Serialize};

use super::QuizError;
use super::round::{GuessLog, Round};
use crate::consts::PENALTY_SECONDS;

/// Result of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub base_play_time: f64,
    pub penalty_time: f64,
    pub final_time: f64,
    pub wrong_count: usize,
}

impl ScoreResult {
    /// "Base Time: 5.0s"
    pub fn base_time_label(&self) -> String {
        format!("Base Time: {}", format_seconds(self.base_play_time))
    }

    /// "Penalty: +1.5s"
    pub fn penalty_label(&self) -> String {
        format!("Penalty: +{}", format_seconds(self.penalty_time))
    }

    /// "6.5s"
    pub fn final_time_label(&self) -> String {
        format_seconds(self.final_time)
    }
}

/// Format seconds with one decimal place and an `s` suffix
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.1}s", seconds)
}

/// Compares guesses to ground truth
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEvaluator;

impl ScoreEvaluator {
    pub fn evaluate(
        round: &Round,
        guesses: &GuessLog,
        base_play_time: f64,
    ) -> Result<ScoreResult, QuizError> {
        if guesses.len() != round.question_count() {
            return Err(QuizError::GuessCountMismatch {
                guesses: guesses.len(),
                equations: round.question_count(),
            });
        }

        let wrong_count = round
            .equations()
            .iter()
            .zip(guesses.as_slice())
            .filter(|(eq, guess)| eq.is_true() != **guess)
            .count();
        let penalty_time = wrong_count as f64 * PENALTY_SECONDS;

        Ok(ScoreResult {
            base_play_time,
            penalty_time,
            final_time: base_play_time + penalty_time,
            wrong_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::equation::Equation;
    use proptest::prelude::*;

    fn round_of(truth: &[bool]) -> Round {
        Round::new(
            truth
                .iter()
                .map(|&t| Equation::new(if t { "2 x 2 = 4" } else { "2 x 2 = 3" }, t))
                .collect(),
        )
    }

    fn truth_pattern() -> Vec<bool> {
        vec![true, false, false, true, false, true, false, false, false, true]
    }

    #[test]
    fn test_all_correct_no_penalty() {
        let truth = truth_pattern();
        let round = round_of(&truth);
        let result = ScoreEvaluator::evaluate(&round, &GuessLog::from(truth), 5.0).unwrap();
        assert_eq!(result.penalty_time, 0.0);
        assert_eq!(result.final_time, 5.0);
        assert_eq!(result.wrong_count, 0);
    }

    #[test]
    fn test_three_wrong() {
        let truth = truth_pattern();
        let round = round_of(&truth);
        let mut guesses = truth.clone();
        for i in [0, 4, 9] {
            guesses[i] = !guesses[i];
        }
        let result = ScoreEvaluator::evaluate(&round, &GuessLog::from(guesses), 5.0).unwrap();
        assert_eq!(result.penalty_time, 1.5);
        assert_eq!(result.final_time, 6.5);
        assert_eq!(result.wrong_count, 3);
    }

    #[test]
    fn test_length_mismatch() {
        let round = round_of(&truth_pattern());
        let err = ScoreEvaluator::evaluate(&round, &GuessLog::from(vec![true]), 1.0).unwrap_err();
        assert_eq!(
            err,
            QuizError::GuessCountMismatch {
                guesses: 1,
                equations: 10
            }
        );
    }

    #[test]
    fn test_labels() {
        let result = ScoreResult {
            base_play_time: 5.0,
            penalty_time: 1.5,
            final_time: 6.5,
            wrong_count: 3,
        };
        assert_eq!(result.base_time_label(), "Base Time: 5.0s");
        assert_eq!(result.penalty_label(), "Penalty: +1.5s");
        assert_eq!(result.final_time_label(), "6.5s");
    }

    proptest! {
        #[test]
        fn evaluate_is_pure(
            pairs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..100),
            base in 0.0f64..500.0,
        ) {
            let truth: Vec<bool> = pairs.iter().map(|p| p.0).collect();
            let guesses = GuessLog::from(pairs.iter().map(|p| p.1).collect::<Vec<_>>());
            let round = round_of(&truth);
            let first = ScoreEvaluator::evaluate(&round, &guesses, base).unwrap();
            let second = ScoreEvaluator::evaluate(&round, &guesses, base).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.final_time, first.base_play_time + first.penalty_time);
        }
    }
}
