use crate::config::LexerConfig;
use crate::error::BuildError;
use crate::lexer::pattern::{Pattern, PatternFlags};
use crate::lexer::standard::Lexer;
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Priority given to tokens that do not set one
pub const DEFAULT_PRIORITY: i32 = 1;

/// Declaration of one token type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TokenDef {
    pub name: CompactString,
    pub pattern: Pattern,
    pub priority: i32,
}

impl TokenDef {
    #[must_use]
    pub fn new(name: impl Into<CompactString>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Token matching exactly `value`
    #[must_use]
    pub fn literal(name: impl Into<CompactString>, value: impl Into<CompactString>) -> Self {
        Self::new(name, Pattern::literal(value))
    }

    /// Token matching the regular expression `source`
    #[must_use]
    pub fn regex(name: impl Into<CompactString>, source: impl Into<CompactString>) -> Self {
        Self::new(name, Pattern::regex(source))
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: PatternFlags) -> Self {
        self.pattern = self.pattern.with_flags(flags);
        self
    }
}

/// Fluent construction of a [`Lexer`]
#[derive(Debug, Clone, Default)]
pub struct LexerBuilder {
    tokens: SmallVec<[TokenDef; 16]>,
    ignore: SmallVec<[CompactString; 4]>,
    config: LexerConfig,
}

impl LexerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token(mut self, def: TokenDef) -> Self {
        self.tokens.push(def);
        self
    }

    #[must_use]
    pub fn tokens(mut self, defs: impl IntoIterator<Item = TokenDef>) -> Self {
        self.tokens.extend(defs);
        self
    }

    #[must_use]
    pub fn literal(self, name: &str, value: &str) -> Self {
        self.token(TokenDef::literal(name, value))
    }

    #[must_use]
    pub fn regex(self, name: &str, source: &str) -> Self {
        self.token(TokenDef::regex(name, source))
    }

    /// Match `name` but never emit it
    #[must_use]
    pub fn ignore(mut self, name: &str) -> Self {
        self.ignore.push(CompactString::new(name));
        self
    }

    #[must_use]
    pub fn config(mut self, config: LexerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the lexer from the declared tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if any token is invalid or the matchers cannot be compiled.
    pub fn build(self) -> Result<Lexer, BuildError> {
        Lexer::with_config(self.tokens.into_vec(), &self.ignore, &self.config)
    }
}
