use crate::text::{TextRange, TextSize};
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token produced by the lexer.
///
/// Each token has a type name, the source text it matched, its byte range in the
/// source, and the line/column at which the match started.
///
/// # Example
///
/// ```rust
/// use lexis::lexer::Token;
/// use lexis::text::TextRange;
///
/// let token = Token::new("NUMBER", "42", TextRange::from_offsets(0, 2), 1, 0);
/// assert_eq!(token.to_string(), "Token(NUMBER, '42')");
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Token {
    /// The token type name (e.g. `NAME`, `NUMBER`, `IF`)
    pub kind: CompactString,
    /// The source text that this token represents
    pub text: CompactString,
    /// The byte range in the source text where this token appears
    pub range: TextRange,
    /// 1-based line of the first character
    pub line: usize,
    /// 0-based column of the first character, in UTF-8 bytes
    pub column: usize,
}

// Grammar matching compares type and text; position is irrelevant.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.text.hash(state);
    }
}

impl Token {
    #[must_use]
    pub fn new(
        kind: impl Into<CompactString>,
        text: impl Into<CompactString>,
        range: TextRange,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            range,
            line,
            column,
        }
    }

    /// Create a token that takes its position from `borrow`.
    ///
    /// The range keeps `borrow`'s start and spans the new text.
    #[must_use]
    pub fn new_borrow_pos(
        kind: impl Into<CompactString>,
        text: impl Into<CompactString>,
        borrow: &Self,
    ) -> Self {
        let text = text.into();
        let range = TextRange::at(borrow.range.start(), TextSize::from_usize(text.len()));
        Self {
            kind: kind.into(),
            text,
            range,
            line: borrow.line,
            column: borrow.column,
        }
    }

    /// Byte offset of the first character
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.range.start().to_usize()
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}, '{}')", self.kind, self.text)
    }
}
