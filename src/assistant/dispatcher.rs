//! Routes parsed SSE frames to application-level chat events.
//!
//! The original callback wiring is modeled as an explicit state machine:
//! the dispatcher is either still streaming or has seen the terminal
//! `complete` event, after which it emits nothing more.

use super::decoder::Utf8StreamDecoder;
use super::sse_parser::{Frame, FrameParser};

/// An application-level event extracted from the SSE stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A fragment of the assistant's answer.
    Message(String),
    /// A fragment of the assistant's reasoning, shown dimmed.
    Thinking(String),
    /// Terminal event; the payload is ignored.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Streaming,
    Complete,
}

/// Decodes raw response bytes and routes frames to [`ChatEvent`]s.
///
/// One dispatcher serves exactly one exchange. All state is owned by the
/// single task driving the read loop; there is no internal concurrency.
#[derive(Debug)]
pub struct StreamDispatcher {
    decoder: Utf8StreamDecoder,
    parser: FrameParser,
    phase: Phase,
}

impl Default for StreamDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDispatcher {
    pub fn new() -> Self {
        Self {
            decoder: Utf8StreamDecoder::new(),
            parser: FrameParser::new(),
            phase: Phase::Streaming,
        }
    }

    /// Feeds one raw network chunk and returns the events it completed.
    ///
    /// After the `complete` event has been seen this is a no-op: nothing
    /// is ever delivered after completion, even if the server keeps
    /// talking.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ChatEvent> {
        if self.phase == Phase::Complete {
            return Vec::new();
        }
        let text = self.decoder.decode(chunk);
        let frames = self.parser.push_chunk(&text);
        self.route(frames)
    }

    /// Signals end of stream: flushes the decoder and parser so a trailing
    /// unterminated frame is not lost. A no-op after completion.
    pub fn finish(&mut self) -> Vec<ChatEvent> {
        if self.phase == Phase::Complete {
            return Vec::new();
        }
        let tail = self.decoder.finish();
        let mut frames = self.parser.push_chunk(&tail);
        frames.extend(self.parser.flush());
        self.route(frames)
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    fn route(&mut self, frames: Vec<Frame>) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        for frame in frames {
            match frame.event.as_str() {
                "message" if !frame.data.is_empty() => {
                    events.push(ChatEvent::Message(frame.data));
                }
                "thinking" if !frame.data.is_empty() => {
                    events.push(ChatEvent::Thinking(frame.data));
                }
                "complete" => {
                    events.push(ChatEvent::Complete);
                    self.phase = Phase::Complete;
                    break;
                }
                // Unrecognized event types are swallowed, not errors.
                _ => {}
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> ChatEvent {
        ChatEvent::Message(text.to_string())
    }

    #[test]
    fn test_message_and_complete() {
        let mut dispatcher = StreamDispatcher::new();
        let events =
            dispatcher.feed(b"event: message\ndata: hello\n\nevent: complete\ndata: done\n\n");
        assert_eq!(events, vec![message("hello"), ChatEvent::Complete]);
        assert!(dispatcher.is_complete());
    }

    #[test]
    fn test_split_at_every_byte_offset() {
        // The canonical two-frame exchange must survive any chunk boundary.
        let input: &[u8] = b"event: message\ndata: hello\n\nevent: complete\ndata: done\n\n";

        for split in 0..=input.len() {
            let mut dispatcher = StreamDispatcher::new();
            let mut events = dispatcher.feed(&input[..split]);
            events.extend(dispatcher.feed(&input[split..]));
            events.extend(dispatcher.finish());

            assert_eq!(
                events,
                vec![message("hello"), ChatEvent::Complete],
                "split at byte {split}"
            );
        }
    }

    #[test]
    fn test_nothing_after_complete() {
        let mut dispatcher = StreamDispatcher::new();
        let events = dispatcher.feed(
            b"event: complete\ndata: done\n\nevent: message\ndata: late\n\n",
        );
        assert_eq!(events, vec![ChatEvent::Complete]);

        assert!(dispatcher.feed(b"event: message\ndata: later\n\n").is_empty());
        assert!(dispatcher.finish().is_empty());
    }

    #[test]
    fn test_thinking_routed_separately() {
        let mut dispatcher = StreamDispatcher::new();
        let events = dispatcher.feed(b"event: thinking\ndata: analyzing\n\n");
        assert_eq!(events, vec![ChatEvent::Thinking("analyzing".to_string())]);
    }

    #[test]
    fn test_unknown_event_types_dropped() {
        let mut dispatcher = StreamDispatcher::new();
        let events = dispatcher.feed(b"event: heartbeat\ndata: ping\n\nevent: message\ndata: hi\n\n");
        assert_eq!(events, vec![message("hi")]);
    }

    #[test]
    fn test_multibyte_character_split_mid_frame() {
        // "你好" = E4 BD A0 E5 A5 BD; cut inside the first character.
        let mut dispatcher = StreamDispatcher::new();
        assert!(dispatcher.feed(b"event: message\ndata: \xE4\xBD").is_empty());
        let events = dispatcher.feed(b"\xA0\xE5\xA5\xBD\n\n");
        assert_eq!(events, vec![message("你好")]);
    }

    #[test]
    fn test_finish_flushes_unterminated_frame() {
        let mut dispatcher = StreamDispatcher::new();
        assert!(dispatcher.feed(b"event: message\ndata: partial").is_empty());
        assert_eq!(dispatcher.finish(), vec![message("partial")]);
    }

    #[test]
    fn test_stream_closure_without_complete() {
        let mut dispatcher = StreamDispatcher::new();
        let events = dispatcher.feed(b"event: message\ndata: hi\n\n");
        assert_eq!(events, vec![message("hi")]);
        assert!(dispatcher.finish().is_empty());
        assert!(!dispatcher.is_complete());
    }
}
