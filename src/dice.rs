//! Two six-sided dice.

use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    pub first: u8,
    pub second: u8,
}

impl DiceRoll {
    pub fn total(&self) -> u8 {
        self.first + self.second
    }

    pub fn is_double(&self) -> bool {
        self.first == self.second
    }

    /// Double six.
    pub fn is_ultra(&self) -> bool {
        self.is_double() && self.first == 6
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.first, self.second, self.total())?;
        if self.is_ultra() {
            write!(f, "  DOUBLE SIX!")
        } else if self.is_double() {
            write!(f, "  DOUBLE!")
        } else {
            Ok(())
        }
    }
}

pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> DiceRoll {
    DiceRoll {
        first: rng.gen_range(1..=6),
        second: rng.gen_range(1..=6),
    }
}
