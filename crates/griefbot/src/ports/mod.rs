//! Ports (Interfaces)
//!
//! Abstract interfaces for the two external systems a run talks to.
//! Implementations live in the CLI crate.

pub mod bot_runner;
pub mod session_framework;

// Re-exports
pub use bot_runner::*;
pub use session_framework::*;
