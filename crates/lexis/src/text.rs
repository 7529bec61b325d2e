//! Byte offsets and spans into the lexed buffer.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text size in bytes (UTF-8)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TextSize(u32);

/// Half-open byte range `start..end`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TextRange {
    start: TextSize,
    end: TextSize,
}

impl TextSize {
    #[must_use]
    pub const fn from(offset: u32) -> Self {
        Self(offset)
    }

    /// Saturating conversion from a buffer offset.
    ///
    /// Buffers beyond 4 GiB clamp to `u32::MAX`.
    #[must_use]
    pub fn from_usize(offset: usize) -> Self {
        Self(u32::try_from(offset).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn into(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl TextRange {
    #[must_use]
    pub const fn new(start: TextSize, end: TextSize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn at(start: TextSize, len: TextSize) -> Self {
        Self::new(start, TextSize(start.0.saturating_add(len.0)))
    }

    /// Range covering `start..start + len` of a buffer, in `usize` offsets.
    #[must_use]
    pub fn from_offsets(start: usize, len: usize) -> Self {
        Self::new(
            TextSize::from_usize(start),
            TextSize::from_usize(start.saturating_add(len)),
        )
    }

    #[must_use]
    pub const fn start(self) -> TextSize {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> TextSize {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> TextSize {
        TextSize(self.end.0 - self.start.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    #[must_use]
    pub const fn contains(self, offset: TextSize) -> bool {
        offset.0 >= self.start.0 && offset.0 < self.end.0
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

#[cfg(feature = "diagnostics")]
impl From<TextRange> for miette::SourceSpan {
    fn from(range: TextRange) -> Self {
        use miette::SourceOffset;
        Self::new(
            SourceOffset::from(range.start().to_usize()),
            range.len().to_usize(),
        )
    }
}
