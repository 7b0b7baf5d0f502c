//! Value objects - Immutable objects defined by their attributes

mod dice;
mod names;
mod outcome;

pub use dice::{DicePolicy, DiceRoll, DiceType};
pub use names::{ActionDescription, Difficulty, PlayerClass, SessionSetup, Theme};
pub use outcome::OutcomeTier;
