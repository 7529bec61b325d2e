//! # Lexer Module
//!
//! Tokenization of source text against a prioritized set of token definitions.
//!
//! ## Overview
//!
//! - **Patterns**: each token is a literal string or a regular expression, with
//!   optional inline flags
//! - **Ordering**: tokens are tried by priority, then maximum width, then literal
//!   length, then name; the first alternative that matches wins, not the longest
//! - **Keyword disambiguation**: a literal also matched by a regex token (a keyword
//!   matched by an identifier pattern) is reported as the literal
//! - **Ignored tokens**: matched and counted for line tracking, never emitted
//! - **Contextual lexing**: per-parser-state token sets switched between tokens
//!
//! ## Usage
//!
//! ```rust
//! use lexis::{LexerBuilder, TokenDef};
//!
//! let lexer = LexerBuilder::new()
//!     .literal("IF", "if")
//!     .regex("NAME", "[a-z]+")
//!     .regex("NUMBER", "[0-9]+")
//!     .token(TokenDef::regex("WS", r"\s+"))
//!     .ignore("WS")
//!     .build()?;
//!
//! let kinds: Vec<_> = lexer
//!     .tokenize("if x 42")?
//!     .into_iter()
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(kinds, ["IF", "NAME", "NUMBER"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Construction returns [`BuildError`](crate::error::BuildError) for invalid token
//! sets. Lexing yields a [`LexError`](crate::error::LexError) when no token matches,
//! after which the stream ends.

pub mod builder;
pub mod contextual;
pub mod line_counter;
pub mod matcher;
pub mod pattern;
pub mod standard;
pub mod stream;
pub mod token;
mod unless;

pub use builder::{DEFAULT_PRIORITY, LexerBuilder, TokenDef};
pub use contextual::{ContextualLexer, ContextualLexerBuilder, ContextualStream, ParserState};
pub use line_counter::{LineCol, LineCounter};
pub use matcher::{CompiledMatcher, Disambiguation, MatchMode};
pub use pattern::{Pattern, PatternFlags, Width};
pub use standard::{Lexer, TypeSet};
pub use stream::{LexStream, TokenSource};
pub use token::Token;
