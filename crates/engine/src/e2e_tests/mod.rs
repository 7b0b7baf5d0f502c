//! End-to-end tests over the fully wired App.
//!
//! These run the real use cases, narration client and in-memory store, with
//! the text-generation collaborator replaced by deterministic stubs. No
//! external services are required.

mod e2e_helpers;
mod gameplay_flow_tests;

pub use e2e_helpers::*;
