//! # da - Dispatch Assistant CLI
//!
//! `da` is a command-line client for the dispatch QA assistant backend.
//! It streams answers over Server-Sent Events, formats shift-report text
//! as it arrives, and can hand finished answers to the TTS service.
//!
//! ## Features
//!
//! - **Streaming answers**: see the assistant's reply as it arrives
//! - **Report formatting**: structural line breaks injected into streamed text
//! - **Chat history**: session metadata cached locally, synced with the backend
//! - **Text-to-speech**: synthesize answers to audio files (mock or real backend)
//!
//! ## Quick Start
//!
//! ```bash
//! # Ask a one-shot question
//! da "今日有哪些告警?"
//!
//! # Ask from stdin
//! cat question.txt | da
//!
//! # Interactive chat mode
//! da chat
//!
//! # Synthesize speech
//! da tts say "交接班总结已生成"
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/da/config.toml`:
//!
//! ```toml
//! [da]
//! endpoint = "http://localhost:8123/api/ai/dispatch_app"
//! tts_endpoint = "http://localhost:8123/api/tts"
//! ```

/// Streaming chat client: SSE frame parser, dispatcher, and transport.
pub mod assistant;

/// Interactive chat mode for assistant sessions.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// Incremental formatter for streamed report text.
pub mod formatter;

/// File system utilities.
pub mod fs;

/// Chat session metadata store.
pub mod history;

/// Input reading from files and stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration, cache, and data.
pub mod paths;

/// Text-to-speech orchestration and backend client.
pub mod tts;

/// Terminal UI components (spinner, colors).
pub mod ui;
