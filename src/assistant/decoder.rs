//! Incremental UTF-8 decoding for streamed response bytes.
//!
//! Network chunks are cut at arbitrary byte offsets, so a multi-byte
//! character (every CJK character in an assistant answer is three bytes)
//! can be split across two chunks. The decoder holds the incomplete
//! trailing sequence until the bytes that finish it arrive.

/// Streaming UTF-8 decoder.
///
/// Invalid byte sequences are replaced with U+FFFD instead of failing:
/// garbled bytes are a protocol-level blemish, not a reason to abort the
/// exchange.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// Incomplete trailing UTF-8 sequence from the previous chunk (≤ 3 bytes).
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one chunk, prepending bytes held from the previous call.
    ///
    /// Returns all complete characters; an incomplete trailing sequence is
    /// held for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let bytes: Vec<u8> = if self.pending.is_empty() {
            chunk.to_vec()
        } else {
            let mut combined = std::mem::take(&mut self.pending);
            combined.extend_from_slice(chunk);
            combined
        };

        let mut out = String::new();
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    return out;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    out.push_str(std::str::from_utf8(&rest[..valid_up_to]).unwrap_or_default());

                    match e.error_len() {
                        // Genuinely invalid bytes: replace and keep going.
                        Some(invalid_len) => {
                            out.push('\u{FFFD}');
                            rest = &rest[valid_up_to + invalid_len..];
                        }
                        // Incomplete trailing sequence: hold it for the next chunk.
                        None => {
                            self.pending = rest[valid_up_to..].to_vec();
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Drains held bytes at end of stream.
    ///
    /// A sequence that never completed is rendered as a single U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            '\u{FFFD}'.to_string()
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"hello world"), "hello world");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_three_byte_char_split_after_first_byte() {
        // "中" is E4 B8 AD
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"data: \xE4"), "data: ");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(b"\xB8\xAD"), "中");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_three_byte_char_split_after_second_byte() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"\xE4\xB8"), "");
        assert_eq!(decoder.pending_len(), 2);
        assert_eq!(decoder.decode(b"\xAD"), "中");
    }

    #[test]
    fn test_four_byte_char_split_across_four_chunks() {
        // "🎉" is F0 9F 8E 89
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"\xF0"), "");
        assert_eq!(decoder.decode(b"\x9F"), "");
        assert_eq!(decoder.decode(b"\x8E"), "");
        assert_eq!(decoder.decode(b"\x89"), "🎉");
    }

    #[test]
    fn test_invalid_bytes_become_replacement_chars() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"ok\xFF\xFEok"), "ok\u{FFFD}\u{FFFD}ok");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_finish_renders_dangling_sequence() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"\xE4\xB8"), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_split_invariance_over_every_offset() {
        let text = "调度助手：今日运行正常 🎉 end";
        let bytes = text.as_bytes();

        for split in 0..=bytes.len() {
            let mut decoder = Utf8StreamDecoder::new();
            let mut out = decoder.decode(&bytes[..split]);
            out.push_str(&decoder.decode(&bytes[split..]));
            out.push_str(&decoder.finish());
            assert_eq!(out, text, "split at byte {split}");
        }
    }
}
