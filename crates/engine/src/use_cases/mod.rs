//! Use cases - User story orchestration.
//!
//! `session` drives the turn engine; `narration` formats prompts for the
//! text-generation collaborator.

pub mod narration;
pub mod session;

pub use narration::{Narration, NarrationClient};
pub use session::SessionUseCases;
