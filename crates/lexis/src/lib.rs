//! # Lexis
//!
//! The lexical-analysis core of a parsing toolkit: token definitions compiled into
//! combined regex matchers, with keyword disambiguation and parser-driven
//! contextual lexing.
//!
//! ## Overview
//!
//! - **[`Lexer`]**: one compiled, prioritized token set
//! - **[`ContextualLexer`]**: one lexer per parser state, switched between tokens
//! - **[`LexStream`]**: the lazy, pull-based token sequence both produce
//!
//! ## Quick Start
//!
//! ```rust
//! use lexis::{ContextualLexer, TokenDef};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum State {
//!     Key,
//!     Value,
//! }
//!
//! let lexer = ContextualLexer::builder()
//!     .token(TokenDef::regex("KEY", "[a-z]+"))
//!     .token(TokenDef::literal("EQ", "="))
//!     .token(TokenDef::regex("VALUE", "[^\n]+"))
//!     .state(State::Key, ["KEY", "EQ"])
//!     .state(State::Value, ["VALUE"])
//!     .build()?;
//!
//! lexer.set_state(State::Key);
//! let mut stream = lexer.lex("name=a b c");
//! let mut values = Vec::new();
//! while let Some(token) = stream.next() {
//!     let token = token?;
//!     if token.kind == "EQ" {
//!         stream.set_state(State::Value);
//!     }
//!     values.push(token.text);
//! }
//! assert_eq!(values, ["name", "=", "a b c"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] - Lexers, patterns, matchers and token streams
//! - [`error`] - Error types and diagnostics
//! - [`config`] - Construction settings
//! - [`text`] - Byte offsets and ranges

pub mod config;
pub mod error;
pub mod lexer;
pub mod text;

pub use config::LexerConfig;
pub use error::{BuildError, LexError, LexErrorKind};
pub use lexer::{
    ContextualLexer, ContextualLexerBuilder, LexStream, Lexer, LexerBuilder, LineCounter,
    Pattern, PatternFlags, Token, TokenDef,
};
pub use text::{TextRange, TextSize};
