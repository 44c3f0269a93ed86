//! Subcommand implementations.

/// One-shot question handler (the default command).
pub mod ask;

/// Chat mode command handler.
pub mod chat;

/// History management command handler.
pub mod history;

/// Text-to-speech command handler.
pub mod tts;
