//! Server-Sent Events (SSE) frame parser for the assistant stream.
//!
//! The backend emits frames of the form:
//!
//! ```text
//! event: message
//! data: <payload>
//!
//! ```
//!
//! Chunk boundaries bear no relation to line or frame boundaries, so the
//! parser keeps the trailing incomplete line buffered across calls. It is
//! a synchronous, single-owner state machine: no locking, strictly ordered.

/// A complete SSE frame: an event type plus its data payload.
///
/// Produced by [`FrameParser`], consumed immediately by the dispatcher,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

/// Incremental SSE parser.
///
/// Feed decoded text with [`push_chunk`](Self::push_chunk); call
/// [`flush`](Self::flush) exactly once at end of stream to recover a
/// trailing unterminated frame. No frame is ever emitted twice.
#[derive(Debug, Default)]
pub struct FrameParser {
    /// Trailing incomplete line, carried across chunk boundaries.
    buffer: String,
    event_type: String,
    event_data: String,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one chunk of decoded text and returns every frame that
    /// became complete. The final unterminated line stays buffered.
    pub fn push_chunk(&mut self, chunk: &str) -> Vec<Frame> {
        self.buffer.push_str(chunk);

        let mut frames = Vec::new();
        while let Some(line_end) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=line_end).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            if line.trim().is_empty() {
                // A blank line terminates the frame.
                if let Some(frame) = self.take_frame() {
                    frames.push(frame);
                }
            } else {
                self.accept_field(line);
            }
        }

        frames
    }

    /// Processes any remaining buffered line(s) after the stream ends and
    /// emits a final frame if both fields were accumulated. Resets the
    /// parser either way.
    pub fn flush(&mut self) -> Option<Frame> {
        let rest = std::mem::take(&mut self.buffer);
        for line in rest.split('\n') {
            self.accept_field(line.trim_end_matches('\r'));
        }
        self.take_frame()
    }

    fn accept_field(&mut self, line: &str) {
        if let Some(value) = line.strip_prefix("event:") {
            self.event_type = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("data:") {
            self.event_data = value.trim().to_string();
        }
        // Anything else (comments, unknown fields) is dropped silently:
        // a garbled line must not abort an otherwise-useful stream.
    }

    /// Emits a frame if both fields are non-empty; resets both regardless.
    fn take_frame(&mut self) -> Option<Frame> {
        let frame = if self.event_type.is_empty() || self.event_data.is_empty() {
            None
        } else {
            Some(Frame {
                event: std::mem::take(&mut self.event_type),
                data: std::mem::take(&mut self.event_data),
            })
        };

        self.event_type.clear();
        self.event_data.clear();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: &str) -> Frame {
        Frame {
            event: event.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_single_frame() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("event: message\ndata: hello\n\n");
        assert_eq!(frames, vec![frame("message", "hello")]);
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut parser = FrameParser::new();
        let frames =
            parser.push_chunk("event: thinking\ndata: hmm\n\nevent: message\ndata: ok\n\n");
        assert_eq!(frames, vec![frame("thinking", "hmm"), frame("message", "ok")]);
    }

    #[test]
    fn test_frame_split_mid_line() {
        let mut parser = FrameParser::new();
        assert!(parser.push_chunk("event: mes").is_empty());
        assert!(parser.push_chunk("sage\ndata: hel").is_empty());
        let frames = parser.push_chunk("lo\n\n");
        assert_eq!(frames, vec![frame("message", "hello")]);
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let input = "event: message\ndata: 你好世界\n\nevent: thinking\ndata: 分析中\n\nevent: complete\ndata: done\n\n";

        let mut whole = FrameParser::new();
        let expected = whole.push_chunk(input);

        for split in 0..=input.len() {
            if !input.is_char_boundary(split) {
                continue;
            }
            let mut parser = FrameParser::new();
            let mut frames = parser.push_chunk(&input[..split]);
            frames.extend(parser.push_chunk(&input[split..]));
            frames.extend(parser.flush());
            assert_eq!(frames, expected, "split at byte {split}");
        }
    }

    #[test]
    fn test_event_without_data_is_not_emitted() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("event: message\n\n");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_data_without_event_is_not_emitted() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("data: orphan\n\n");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_terminator_resets_pending_fields() {
        let mut parser = FrameParser::new();
        // The lone event type is discarded by the first terminator, so the
        // later data line has no type to pair with.
        assert!(parser.push_chunk("event: message\n\ndata: hello\n\n").is_empty());
    }

    #[test]
    fn test_empty_data_value_is_not_emitted() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("event: message\ndata:\n\n");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("event:  message \ndata:  spaced out \n\n");
        assert_eq!(frames, vec![frame("message", "spaced out")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("event: message\r\ndata: hello\r\n\r\n");
        assert_eq!(frames, vec![frame("message", "hello")]);
    }

    #[test]
    fn test_unknown_field_lines_are_dropped() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk(": comment\nretry: 500\nevent: message\ndata: hi\n\n");
        assert_eq!(frames, vec![frame("message", "hi")]);
    }

    #[test]
    fn test_unrecognized_event_type_still_produces_frame() {
        // Routing (and dropping) of unknown types is the dispatcher's job.
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("event: heartbeat\ndata: ping\n\n");
        assert_eq!(frames, vec![frame("heartbeat", "ping")]);
    }

    #[test]
    fn test_flush_emits_trailing_unterminated_frame() {
        let mut parser = FrameParser::new();
        assert!(parser.push_chunk("event: message\ndata: partial").is_empty());
        assert_eq!(parser.flush(), Some(frame("message", "partial")));
    }

    #[test]
    fn test_flush_with_event_only_emits_nothing() {
        let mut parser = FrameParser::new();
        assert!(parser.push_chunk("event: message\n").is_empty());
        assert_eq!(parser.flush(), None);
    }

    #[test]
    fn test_flush_recovers_complete_lines_without_terminator() {
        let mut parser = FrameParser::new();
        assert!(parser.push_chunk("event: message\ndata: tail\n").is_empty());
        assert_eq!(parser.flush(), Some(frame("message", "tail")));
    }

    #[test]
    fn test_no_frame_emitted_twice() {
        let mut parser = FrameParser::new();
        assert!(parser.push_chunk("event: message\ndata: once").is_empty());
        assert!(parser.flush().is_some());
        assert_eq!(parser.flush(), None);
    }

    #[test]
    fn test_last_data_line_wins_within_frame() {
        let mut parser = FrameParser::new();
        let frames = parser.push_chunk("event: message\ndata: first\ndata: second\n\n");
        assert_eq!(frames, vec![frame("message", "second")]);
    }
}
