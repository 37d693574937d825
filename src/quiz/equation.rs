//! Single true/false multiplication statements

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::OPERAND_LIMIT;

/// A displayed multiplication statement and whether it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    text: String,
    is_true: bool,
}

impl Equation {
    pub fn new(text: impl Into<String>, is_true: bool) -> Self {
        Self {
            text: text.into(),
            is_true,
        }
    }

    /// Text shown to the player, e.g. `"3 x 4 = 12"`
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_true(&self) -> bool {
        self.is_true
    }
}

/// Ways a false statement is derived from a true product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falsification {
    /// `a x (b + 1) = a * b`
    BumpSecondOperand,
    /// `a x b = a * b - 1`
    DecrementProduct,
    /// `(a + 1) x b = a * b`
    BumpFirstOperand,
}

impl Falsification {
    pub const ALL: [Falsification; 3] = [
        Falsification::BumpSecondOperand,
        Falsification::DecrementProduct,
        Falsification::BumpFirstOperand,
    ];

    /// Display text for operands `a`, `b` under this falsification
    pub fn render(&self, a: u32, b: u32) -> String {
        let product = (a * b) as i64;
        match self {
            Falsification::BumpSecondOperand => format!("{} x {} = {}", a, b + 1, product),
            Falsification::DecrementProduct => format!("{} x {} = {}", a, b, product - 1),
            Falsification::BumpFirstOperand => format!("{} x {} = {}", a + 1, b, product),
        }
    }
}

/// Produces equations from an injected random source
pub struct EquationGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> EquationGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Access the underlying RNG (the round builder shuffles with it)
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Generate one statement; `want_true` selects the ground truth
    pub fn generate(&mut self, want_true: bool) -> Equation {
        if want_true {
            let (a, b) = self.operands();
            return Equation::new(format!("{} x {} = {}", a, b, a * b), true);
        }
        self.generate_false().0
    }

    /// Generate a false statement along with the falsification used
    pub fn generate_false(&mut self) -> (Equation, Falsification) {
        let (a, b) = self.operands();
        let strategy = Falsification::ALL[self.rng.random_range(0..Falsification::ALL.len())];
        (Equation::new(strategy.render(a, b), false), strategy)
    }

    fn operands(&mut self) -> (u32, u32) {
        let a = self.rng.random_range(0..OPERAND_LIMIT);
        let b = self.rng.random_range(0..OPERAND_LIMIT);
        (a, b)
    }
}
