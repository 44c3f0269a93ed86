//! Incremental formatter for streamed report text.
//!
//! Assistant answers arrive as a run of characters with no layout: section
//! headers and enumerated items are glued to the surrounding prose. The
//! formatter injects structural line breaks as the text streams, one
//! character at a time, using a bounded trailing window to recognize
//! patterns that span chunk boundaries.
//!
//! Output is append-only: once a character (and any break inserted before
//! it) has been emitted it is never revisited, so the result is invariant
//! under arbitrary chunk splitting. To make that possible for patterns
//! that need one character of lookahead (`1.` vs `1.5`), a lone digit and
//! a digit-plus-dot may be held until the next character resolves them;
//! [`StreamFormatter::finish`] resolves a pattern still held at end of
//! stream.

/// Section headers that start a new line when they appear mid-stream.
///
/// This list mirrors the shift-report layout the backend produces. It is
/// a narrow heuristic tied to that report format, so it is carried as
/// configuration data rather than baked into the algorithm.
pub const DEFAULT_SECTION_HEADERS: &[&str] = &["昨日处理主要工作", "今日关注工作", "交接班总结"];

/// Upper bound on the trailing context window, in characters.
const WINDOW_LEN: usize = 20;

/// Formatter configuration.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Multi-character keywords whose first character triggers a break.
    pub section_headers: Vec<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            section_headers: DEFAULT_SECTION_HEADERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// A possibly-incomplete numbered-item prefix held for one character of
/// lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    /// A digit not preceded by another digit; may start `1.` or `2、`.
    Digit(char),
    /// Digit plus `.`; a following digit would make it a decimal.
    NumberDot(char),
}

/// Single-pass streaming formatter.
///
/// One formatter serves one logical message stream. Thread it across
/// successive [`push`](Self::push) calls; call [`reset`](Self::reset)
/// only when a new message starts, never mid-stream.
#[derive(Debug)]
pub struct StreamFormatter {
    options: FormatOptions,
    /// Trailing window of emitted characters, capped at [`WINDOW_LEN`].
    window: String,
    pending: Pending,
}

impl Default for StreamFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamFormatter {
    pub fn new() -> Self {
        Self::with_options(FormatOptions::default())
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            options,
            window: String::new(),
            pending: Pending::None,
        }
    }

    /// Formats one chunk, carrying context from previous chunks.
    ///
    /// The returned text may include characters held from an earlier call
    /// once the pattern they belonged to is resolved.
    pub fn push(&mut self, chunk: &str) -> String {
        let mut out = String::new();
        for c in chunk.chars() {
            self.step(c, &mut out);
        }
        out
    }

    /// Resolves any held prefix at end of stream.
    pub fn finish(&mut self) -> String {
        let mut out = String::new();
        match self.pending {
            Pending::None => {}
            Pending::Digit(d) => self.emit(d, &mut out),
            Pending::NumberDot(d) => {
                self.emit_break(&mut out);
                self.emit(d, &mut out);
                self.emit('.', &mut out);
            }
        }
        self.pending = Pending::None;
        out
    }

    /// Clears all context. Only valid between messages.
    pub fn reset(&mut self) {
        self.window.clear();
        self.pending = Pending::None;
    }

    fn step(&mut self, c: char, out: &mut String) {
        match self.pending {
            Pending::Digit(d) => {
                if c == '、' {
                    // Enumerator like "2、": break before the digit.
                    self.pending = Pending::None;
                    self.emit_break(out);
                    self.emit(d, out);
                    self.emit(c, out);
                    return;
                }
                if c == '.' {
                    self.pending = Pending::NumberDot(d);
                    return;
                }
                self.pending = Pending::None;
                self.emit(d, out);
            }
            Pending::NumberDot(d) => {
                self.pending = Pending::None;
                if c.is_ascii_digit() {
                    // Decimal like "3.14": no break.
                    self.emit(d, out);
                    self.emit('.', out);
                } else {
                    self.emit_break(out);
                    self.emit(d, out);
                    self.emit('.', out);
                }
            }
            Pending::None => {}
        }

        // Nothing is pending past this point.
        if c.is_ascii_digit() && !self.last_char_is_digit() {
            self.pending = Pending::Digit(c);
            return;
        }

        if self.is_section_start(c) {
            self.emit_break(out);
        }
        self.emit(c, out);
    }

    /// A configured header's first character triggers a break unless the
    /// full header already appears in the trailing window (avoids
    /// re-triggering on a header mentioned in running prose).
    fn is_section_start(&self, c: char) -> bool {
        self.options
            .section_headers
            .iter()
            .any(|header| header.chars().next() == Some(c) && !self.window.contains(header.as_str()))
    }

    fn last_char_is_digit(&self) -> bool {
        self.window.chars().last().is_some_and(|c| c.is_ascii_digit())
    }

    fn emit(&mut self, c: char, out: &mut String) {
        out.push(c);
        self.window.push(c);
        self.trim_window();
    }

    /// Inserts a break unless nothing has been emitted yet or the last
    /// emitted character is already a newline.
    fn emit_break(&mut self, out: &mut String) {
        if self.window.is_empty() || self.window.ends_with('\n') {
            return;
        }
        out.push('\n');
        self.window.push('\n');
        self.trim_window();
    }

    fn trim_window(&mut self) {
        let excess = self.window.chars().count().saturating_sub(WINDOW_LEN);
        if excess > 0 {
            if let Some((idx, _)) = self.window.char_indices().nth(excess) {
                self.window.drain(..idx);
            }
        }
    }
}
