//! Incremental line and column tracking
//!
//! A [`LineCounter`] follows a lexing session through the buffer, turning the
//! absolute offset reached so far into a line/column position. It only moves
//! forward; each session owns its own counter.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Represents a line and column position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LineCol {
    /// One-based line number
    pub line: usize,
    /// Zero-based column number (in UTF-8 bytes)
    pub column: usize,
}

impl LineCol {
    /// Create a new line/column position
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Offset-to-position bookkeeping for one pass over a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCounter {
    /// Absolute byte offset consumed so far
    pub char_pos: usize,
    /// One-based current line
    pub line: usize,
    /// Zero-based current column
    pub column: usize,
    /// Byte offset where the current line starts
    pub line_start_pos: usize,
}

impl Default for LineCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCounter {
    pub const NEWLINE: u8 = b'\n';

    #[must_use]
    pub const fn new() -> Self {
        Self {
            char_pos: 0,
            line: 1,
            column: 0,
            line_start_pos: 0,
        }
    }

    /// Consume `text` and compute the new line and column.
    ///
    /// `test_newline = false` skips the newline scan; pass it only for text that is
    /// known not to contain a newline.
    pub fn feed(&mut self, text: &str, test_newline: bool) {
        if test_newline {
            let bytes = text.as_bytes();
            let newlines = memchr::memchr_iter(Self::NEWLINE, bytes).count();
            if newlines > 0 {
                self.line += newlines;
                if let Some(last) = memchr::memrchr(Self::NEWLINE, bytes) {
                    self.line_start_pos = self.char_pos + last + 1;
                }
            }
        }

        self.char_pos += text.len();
        self.column = self.char_pos - self.line_start_pos;
    }

    /// Current position
    #[must_use]
    pub const fn line_col(&self) -> LineCol {
        LineCol::new(self.line, self.column)
    }
}
