//! Text-to-speech orchestration and backend client.
//!
//! Synthesis runs through a small state machine ([`TtsEngine`]) that
//! validates input, talks to the TTS service (or a mock), and owns the
//! lifecycle of the generated audio file.

mod client;
mod config;
mod engine;

pub use client::{ApiEnvelope, CleanupSummary, ConvertOutcome, TtsClient, TtsStatus, VoiceCatalog};
pub use config::{TtsConfig, TtsConfigStore, TtsOverrides};
pub use engine::{MAX_TEXT_LENGTH, Synthesis, TtsEngine, TtsError, TtsMode, TtsState};
