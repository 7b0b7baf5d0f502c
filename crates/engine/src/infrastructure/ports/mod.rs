//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Session storage (could swap SQLite -> Postgres)
//! - LLM calls (could swap Ollama -> Claude/OpenAI)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{ActionRepo, SessionRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{FinishReason, LlmPort, LlmRequest, LlmResponse};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockLlmPort;
#[cfg(test)]
pub use repos::{MockActionRepo, MockSessionRepo};
#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{LlmError, RepoError};
