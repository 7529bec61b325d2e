use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration shared by [`Lexer`](crate::Lexer) and
/// [`ContextualLexer`](crate::ContextualLexer) construction
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct LexerConfig {
    /// Maximum number of explicit capture groups in one combined matcher.
    ///
    /// Token sets that need more groups are split across several matchers.
    pub max_groups: usize,

    /// NFA size limit handed to the regex engine (`None` keeps the engine default).
    ///
    /// Exceeding it is treated like exceeding `max_groups`.
    pub regex_size_limit: Option<usize>,

    /// Number of characters captured as context in a lexical error
    pub context_len: usize,

    /// Name of the synthetic end-of-stream terminal
    pub end_marker: CompactString,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            max_groups: 100,
            regex_size_limit: None,
            context_len: 5,
            end_marker: CompactString::const_new("$END"),
        }
    }
}

impl LexerConfig {
    #[must_use]
    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = max_groups.max(1);
        self
    }

    #[must_use]
    pub const fn with_regex_size_limit(mut self, limit: Option<usize>) -> Self {
        self.regex_size_limit = limit;
        self
    }

    #[must_use]
    pub const fn with_context_len(mut self, context_len: usize) -> Self {
        self.context_len = context_len;
        self
    }

    #[must_use]
    pub fn with_end_marker(mut self, end_marker: impl Into<CompactString>) -> Self {
        self.end_marker = end_marker.into();
        self
    }
}
