//! Streaming chat client for the dispatch assistant backend.
//!
//! The backend speaks Server-Sent Events over HTTP POST. This module owns
//! the full pipeline from raw response bytes to application-level events:
//! incremental UTF-8 decoding, SSE frame parsing, and event routing.

mod client;
mod decoder;
mod dispatcher;
mod sse_parser;

pub use client::{AssistantClient, ChatRequest, StreamError, SyncReply};
pub use decoder::Utf8StreamDecoder;
pub use dispatcher::{ChatEvent, StreamDispatcher};
pub use sse_parser::{Frame, FrameParser};
