//! Interactive chat mode for assistant sessions.
//!
//! Provides a REPL-style interface with slash commands for session
//! control.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod ui;

pub use session::{ChatSession, SessionConfig};
