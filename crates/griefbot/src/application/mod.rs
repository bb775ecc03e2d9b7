//! Application Layer
//!
//! Use cases that drive the ports: the session orchestrator and session log export.

pub mod orchestrator;
pub mod session_log;

pub use orchestrator::*;
pub use session_log::*;
