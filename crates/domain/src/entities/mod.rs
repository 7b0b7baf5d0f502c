//! Entities - domain objects with identity owned by an aggregate

pub mod action;

pub use action::Action;
