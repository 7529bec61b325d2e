//! # Error Types
//!
//! Errors raised while building lexers and while lexing.
//!
//! ## Overview
//!
//! - [`BuildError`]: fatal problems found while constructing a [`Lexer`](crate::Lexer)
//!   or [`ContextualLexer`](crate::ContextualLexer). There is never a partially usable
//!   lexer; construction either succeeds or returns one of these.
//! - [`LexError`]: raised by a lexing session when no token matches at the current
//!   position. It ends the session; tokens produced before it remain valid.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! for rich error reporting with source code snippets.

pub mod diagnostics;

use crate::text::TextRange;
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors detected while constructing a lexer
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum BuildError {
    #[error("Lexer does not allow zero-width tokens ({name}: {pattern})")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::zero_width)))]
    ZeroWidth {
        name: CompactString,
        pattern: String,
    },

    #[error("Cannot compile token {name}: {pattern}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_pattern)))]
    InvalidPattern {
        name: CompactString,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Cannot determine the width of token {name}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::pattern_analysis)))]
    PatternAnalysis {
        name: CompactString,
        #[source]
        source: regex_syntax::Error,
    },

    #[error("Unknown pattern flag '{flag}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unknown_flag)))]
    UnknownFlag { flag: char },

    #[error("Ignored token {name} is not declared")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::undeclared_ignore)))]
    UndeclaredIgnore { name: CompactString },

    #[error("Token {name} is declared more than once")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::duplicate_token)))]
    DuplicateToken { name: CompactString },

    #[error("Parser state {state} accepts undeclared token {name}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unknown_token)))]
    UnknownToken { state: String, name: CompactString },

    #[error("Token {name} alone exceeds the limit of {limit} capture groups per matcher")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::group_limit)))]
    GroupLimit { name: CompactString, limit: usize },

    #[error("Failed to compile combined matcher")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::matcher_compile)))]
    MatcherCompile {
        #[source]
        source: regex_automata::meta::BuildError,
    },

    #[error("Disambiguation for token {name} resolved to no literal matcher")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::empty_disambiguation)))]
    EmptyDisambiguation { name: CompactString },
}

/// Lexical error with location information
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("{kind} in {context:?} at line {line} col {column}")]
pub struct LexError {
    /// Span of the offending character
    #[cfg_attr(feature = "diagnostics", label)]
    pub span: TextRange,
    /// 1-based line of the failure
    pub line: usize,
    /// 0-based column of the failure (in UTF-8 bytes)
    pub column: usize,
    /// Short lookahead window starting at the failure
    pub context: CompactString,
    /// Token types that were acceptable at this point, when known
    pub allowed: Option<Vec<CompactString>>,
    #[source]
    pub kind: LexErrorKind,
}

/// Types of lexical errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexErrorKind {
    #[error("No token defined for: '{char}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unexpected_char)))]
    UnexpectedChar { char: char },

    #[error("No lexer for parser state {state}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unknown_state)))]
    UnknownState { state: String },
}

impl LexErrorKind {
    /// Create an unexpected character error
    #[must_use]
    pub const fn unexpected_char(char: char) -> Self {
        Self::UnexpectedChar { char }
    }

    /// Create an unknown parser state error
    #[must_use]
    pub fn unknown_state(state: impl std::fmt::Debug) -> Self {
        Self::UnknownState {
            state: format!("{state:?}"),
        }
    }
}

impl LexError {
    /// Build an error positioned at byte offset `pos` of `text`.
    ///
    /// `context_len` characters starting at `pos` are kept as context.
    #[must_use]
    pub fn at(
        text: &str,
        pos: usize,
        line: usize,
        column: usize,
        context_len: usize,
        kind: LexErrorKind,
    ) -> Self {
        let rest = text.get(pos..).unwrap_or_default();
        let char_len = rest.chars().next().map_or(0, char::len_utf8);
        let context = rest.chars().take(context_len).collect();
        Self {
            span: TextRange::from_offsets(pos, char_len),
            line,
            column,
            context,
            allowed: None,
            kind,
        }
    }

    /// Attach the set of token types that were acceptable.
    #[must_use]
    pub fn with_allowed(mut self, allowed: Vec<CompactString>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Get the span (location) of this error
    #[must_use]
    pub const fn span(&self) -> TextRange {
        self.span
    }

    /// Byte offset at which lexing failed
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.start().to_usize()
    }

    /// Get the kind of lexical error
    #[must_use]
    pub const fn kind(&self) -> &LexErrorKind {
        &self.kind
    }

    /// The character no token could start with, if that is what failed
    #[must_use]
    pub const fn unexpected_char(&self) -> Option<char> {
        match self.kind {
            LexErrorKind::UnexpectedChar { char } => Some(char),
            LexErrorKind::UnknownState { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_message() {
        let err = LexError::at("1+2", 0, 1, 0, 5, LexErrorKind::unexpected_char('1'));
        assert_eq!(
            err.to_string(),
            "No token defined for: '1' in \"1+2\" at line 1 col 0"
        );
    }

    #[test]
    fn test_lex_error_context_is_char_bounded() {
        let err = LexError::at("xé漢字abcdef", 1, 1, 1, 3, LexErrorKind::unexpected_char('é'));
        assert_eq!(err.context, "é漢字");
        assert_eq!(err.offset(), 1);
        assert_eq!(err.span().len().to_usize(), 'é'.len_utf8());
        assert_eq!(err.unexpected_char(), Some('é'));
    }

    #[test]
    fn test_lex_error_with_allowed() {
        let err = LexError::at("?", 0, 1, 0, 5, LexErrorKind::unexpected_char('?'))
            .with_allowed(vec!["A".into(), "B".into()]);
        assert_eq!(err.allowed.as_deref().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_unknown_state_kind() {
        let kind = LexErrorKind::unknown_state(Some(7));
        assert_eq!(kind.to_string(), "No lexer for parser state Some(7)");
    }

    #[test]
    fn test_build_error_messages() {
        let err = BuildError::ZeroWidth {
            name: "EMPTY".into(),
            pattern: "a*".into(),
        };
        assert_eq!(
            err.to_string(),
            "Lexer does not allow zero-width tokens (EMPTY: a*)"
        );

        let err = BuildError::UndeclaredIgnore { name: "WS".into() };
        assert_eq!(err.to_string(), "Ignored token WS is not declared");
    }
}
