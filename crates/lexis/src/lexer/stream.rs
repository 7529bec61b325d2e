//! # Streaming Token Production
//!
//! The lexing loop shared by [`Lexer`] and
//! [`ContextualLexer`](crate::lexer::ContextualLexer).
//!
//! ## Overview
//!
//! A [`LexStream`] is a pull-based iterator over one buffer. Each call to `next`:
//!
//! 1. asks its [`TokenSource`] for the currently active [`Lexer`],
//! 2. tries that lexer's matchers in order, anchored at the current offset,
//! 3. skips ignored token types, feeding them to the line counter,
//! 4. yields the first other match as a [`Token`] positioned where the match began.
//!
//! Because the active lexer is looked up again on every call, a consumer that
//! changes the source's state between two tokens changes which token types are
//! legal for the very next match.
//!
//! The stream is fused: after an error or the end of input it yields `None`.
//!
//! ## Usage
//!
//! ```rust
//! use lexis::{Lexer, TokenDef};
//!
//! let lexer = Lexer::new(
//!     vec![TokenDef::regex("NAME", "[a-z]+"), TokenDef::regex("WS", " +")],
//!     &["WS"],
//! )?;
//!
//! let texts: Vec<_> = lexer
//!     .lex("ab cd")
//!     .map(|token| token.map(|t| t.text))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(texts, ["ab", "cd"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{LexError, LexErrorKind};
use crate::lexer::line_counter::LineCounter;
use crate::lexer::standard::{Lexer, TypeSet};
use crate::lexer::token::Token;
use crate::text::TextRange;
use compact_str::CompactString;
use std::iter::FusedIterator;
use tracing::debug;

/// Supplies the lexer and type sets a [`LexStream`] works with
pub trait TokenSource {
    /// Lexer for the next match attempt.
    ///
    /// # Errors
    ///
    /// Returns an error kind if no lexer is available in the current state.
    fn active_lexer(&self) -> Result<&Lexer, LexErrorKind>;

    /// Types whose matches may contain a newline
    fn newline_types(&self) -> &TypeSet;

    /// Types that are matched but never emitted
    fn ignore_types(&self) -> &TypeSet;

    /// Characters of lookahead kept in a lexical error
    fn context_len(&self) -> usize;

    /// Token names to report as acceptable when `lexer` fails to match.
    fn allowed_on_error(&self, _lexer: &Lexer) -> Option<Vec<CompactString>> {
        None
    }
}

/// One lexing session over a buffer
#[derive(Debug, Clone)]
pub struct LexStream<'a, L: ?Sized> {
    source: &'a L,
    text: &'a str,
    counter: LineCounter,
    finished: bool,
}

impl<'a, L: TokenSource + ?Sized> LexStream<'a, L> {
    /// Start a session at the beginning of `text`.
    #[must_use]
    pub const fn new(source: &'a L, text: &'a str) -> Self {
        Self {
            source,
            text,
            counter: LineCounter::new(),
            finished: false,
        }
    }

    #[must_use]
    pub const fn source(&self) -> &'a L {
        self.source
    }

    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Position reached so far
    #[must_use]
    pub const fn line_counter(&self) -> &LineCounter {
        &self.counter
    }

    /// Whether the stream has ended, by error or end of input
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    fn fail(&mut self, kind: LexErrorKind, allowed: Option<Vec<CompactString>>) -> LexError {
        self.finished = true;
        let error = LexError::at(
            self.text,
            self.counter.char_pos,
            self.counter.line,
            self.counter.column,
            self.source.context_len(),
            kind,
        );
        debug!(offset = error.offset(), line = error.line, column = error.column, "{error}");
        match allowed {
            Some(allowed) => error.with_allowed(allowed),
            None => error,
        }
    }
}

impl<L: TokenSource + ?Sized> Iterator for LexStream<'_, L> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let source = self.source;
        loop {
            let lexer = match source.active_lexer() {
                Ok(lexer) => lexer,
                Err(kind) => return Some(Err(self.fail(kind, None))),
            };

            let pos = self.counter.char_pos;
            let Some((end, alternative)) = lexer
                .matchers()
                .iter()
                .find_map(|matcher| matcher.match_at(self.text, pos))
            else {
                let Some(char) = self.text.get(pos..).and_then(|rest| rest.chars().next()) else {
                    self.finished = true;
                    return None;
                };
                let allowed = source.allowed_on_error(lexer);
                return Some(Err(self.fail(LexErrorKind::unexpected_char(char), allowed)));
            };

            let value = &self.text[pos..end];
            let test_newline = source.newline_types().contains(&alternative.name);

            if source.ignore_types().contains(&alternative.name) {
                self.counter.feed(value, test_newline);
                continue;
            }

            let token = Token::new(
                alternative.kind_for(value).clone(),
                value,
                TextRange::from_offsets(pos, value.len()),
                self.counter.line,
                self.counter.column,
            );
            self.counter.feed(value, test_newline);
            return Some(Ok(token));
        }
    }
}

impl<L: TokenSource + ?Sized> FusedIterator for LexStream<'_, L> {}
