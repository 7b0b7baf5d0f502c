//! Aggregate roots - domain objects that own their related data
//!
//! A session owns its ordered turns. The engine is the only writer: it replaces
//! the session's current context after every turn and never touches the
//! initial scenario.

pub mod session;

pub use session::{Session, SessionView};
