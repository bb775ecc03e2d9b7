//! Domain Entities
//!
//! - Profile: grief persona driving one bot
//! - Prompt: prompt overrides handed to the bot library
//! - Session: handle of an experiment session
//! - SessionLog: record written after a run

mod profile;
mod prompt;
mod session;
mod session_log;

pub use profile::*;
pub use prompt::*;
pub use session::*;
pub use session_log::*;
