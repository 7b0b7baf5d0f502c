//! Infrastructure layer - adapters behind the port traits.

pub mod clock;
pub mod config;
pub mod memory;
pub mod ollama;
pub mod ports;
pub mod resilient_llm;
pub mod sqlite;
