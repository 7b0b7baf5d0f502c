//! Taleturn domain.
//!
//! Sessions, their turns, dice and outcome classification. This crate has no
//! I/O and no randomness of its own; the engine injects both.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Session, SessionView};
pub use entities::Action;
pub use error::DomainError;
pub use ids::{ActionId, SessionToken};
pub use value_objects::{
    ActionDescription, DicePolicy, DiceRoll, DiceType, Difficulty, OutcomeTier, PlayerClass,
    SessionSetup, Theme,
};
