//! Taleturn Engine library.
//!
//! Server-side turn engine for narrated tabletop sessions.
//!
//! ## Structure
//!
//! - `use_cases/` - Turn engine and narration client
//! - `infrastructure/` - Port traits and their adapters (storage, LLM, clock, config)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// E2E tests over the fully wired App with stubbed text generation.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
