//! # Contextual Lexing
//!
//! A [`ContextualLexer`] holds one [`Lexer`] per parser state, each compiled over only
//! the token types that state accepts. The parser driving the session reports its
//! state through [`ContextualLexer::set_state`] (or [`ContextualStream::set_state`])
//! between tokens, and the next match attempt uses that state's lexer.
//!
//! States whose accepted sets are equal share a single compiled lexer. Newline and
//! ignore handling always come from a root lexer over the full token list, so line
//! tracking does not depend on which state is active.
//!
//! The current state is a single cell. Driving one `ContextualLexer` from several
//! concurrent sessions requires the callers to coordinate their state changes.

use crate::config::LexerConfig;
use crate::error::{BuildError, LexError, LexErrorKind};
use crate::lexer::builder::TokenDef;
use crate::lexer::standard::{Lexer, TypeSet};
use crate::lexer::stream::{LexStream, TokenSource};
use crate::lexer::token::Token;
use compact_str::CompactString;
use hashbrown::HashMap;
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Bounds required of a parser state identifier
pub trait ParserState: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> ParserState for T {}

/// Family of lexers selected by external parser state
#[derive(Debug)]
pub struct ContextualLexer<S> {
    lexers: HashMap<S, Arc<Lexer>, ahash::RandomState>,
    root_lexer: Lexer,
    state: RwLock<Option<S>>,
    distinct_lexers: usize,
}

impl<S: ParserState> ContextualLexer<S> {
    #[must_use]
    pub fn builder() -> ContextualLexerBuilder<S> {
        ContextualLexerBuilder::new()
    }

    /// Build one lexer per state.
    ///
    /// Each state's lexer covers its declared accepts plus `ignore` and
    /// `always_accept`, minus the configured end marker.
    ///
    /// # Errors
    ///
    /// Fails if a state names an undeclared token, or if any member lexer fails to
    /// build.
    pub fn new<N, I>(
        tokens: Vec<TokenDef>,
        states: I,
        ignore: &[N],
        always_accept: &[N],
        config: &LexerConfig,
    ) -> Result<Self, BuildError>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (S, Vec<CompactString>)>,
    {
        let (lexers, distinct_lexers) = {
            let mut tokens_by_name: HashMap<&str, &TokenDef, ahash::RandomState> =
                HashMap::with_capacity_and_hasher(tokens.len(), ahash::RandomState::new());
            for def in &tokens {
                if tokens_by_name.insert(def.name.as_str(), def).is_some() {
                    return Err(BuildError::DuplicateToken {
                        name: def.name.clone(),
                    });
                }
            }

            let mut by_accepts: HashMap<BTreeSet<CompactString>, Arc<Lexer>, ahash::RandomState> =
                HashMap::with_hasher(ahash::RandomState::new());
            let mut lexers = HashMap::with_hasher(ahash::RandomState::new());

            for (state, accepts) in states {
                let accepts: BTreeSet<CompactString> = accepts
                    .into_iter()
                    .chain(ignore.iter().map(|name| CompactString::new(name.as_ref())))
                    .chain(always_accept.iter().map(|name| CompactString::new(name.as_ref())))
                    .filter(|name| *name != config.end_marker)
                    .collect();

                let lexer = if let Some(lexer) = by_accepts.get(&accepts) {
                    Arc::clone(lexer)
                } else {
                    let state_tokens = accepts
                        .iter()
                        .map(|name| {
                            tokens_by_name
                                .get(name.as_str())
                                .map(|def| (*def).clone())
                                .ok_or_else(|| BuildError::UnknownToken {
                                    state: format!("{state:?}"),
                                    name: name.clone(),
                                })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    let lexer = Arc::new(Lexer::with_config(state_tokens, ignore, config)?);
                    by_accepts.insert(accepts, Arc::clone(&lexer));
                    lexer
                };
                lexers.insert(state, lexer);
            }
            (lexers, by_accepts.len())
        };

        let root_lexer = Lexer::with_config(tokens, ignore, config)?;

        debug!(
            states = lexers.len(),
            distinct = distinct_lexers,
            "built contextual lexer"
        );

        Ok(Self {
            lexers,
            root_lexer,
            state: RwLock::new(None),
            distinct_lexers,
        })
    }

    /// Switch parser state; applies from the next match attempt onward.
    pub fn set_state(&self, state: S) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(state);
    }

    /// Forget the current state; sessions fail until a state is set again.
    pub fn clear_state(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn current_state(&self) -> Option<S> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lexer compiled for `state`
    #[must_use]
    pub fn lexer_for(&self, state: &S) -> Option<&Lexer> {
        self.lexers.get(state).map(Arc::as_ref)
    }

    /// Lexer over every declared token
    #[must_use]
    pub const fn root_lexer(&self) -> &Lexer {
        &self.root_lexer
    }

    /// Number of compiled per-state lexers after sharing
    #[must_use]
    pub const fn distinct_lexer_count(&self) -> usize {
        self.distinct_lexers
    }

    /// Lazily tokenize `text`, following state changes between tokens.
    #[must_use]
    pub fn lex<'a>(&'a self, text: &'a str) -> ContextualStream<'a, S> {
        ContextualStream {
            inner: LexStream::new(self, text),
        }
    }

    /// Tokenize the whole of `text` in the current state.
    ///
    /// # Errors
    ///
    /// Returns the first lexical error.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexError> {
        self.lex(text).collect()
    }
}

impl<S: ParserState> TokenSource for ContextualLexer<S> {
    fn active_lexer(&self) -> Result<&Lexer, LexErrorKind> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .as_ref()
            .and_then(|state| self.lexers.get(state))
            .map(Arc::as_ref)
            .ok_or_else(|| LexErrorKind::unknown_state(state.as_ref()))
    }

    fn newline_types(&self) -> &TypeSet {
        self.root_lexer.newline_types()
    }

    fn ignore_types(&self) -> &TypeSet {
        self.root_lexer.ignore_types()
    }

    fn context_len(&self) -> usize {
        self.root_lexer.context_len()
    }

    fn allowed_on_error(&self, lexer: &Lexer) -> Option<Vec<CompactString>> {
        Some(lexer.accepted_names().to_vec())
    }
}

/// A lexing session driven by a [`ContextualLexer`]
#[derive(Debug)]
pub struct ContextualStream<'a, S> {
    inner: LexStream<'a, ContextualLexer<S>>,
}

impl<'a, S: ParserState> ContextualStream<'a, S> {
    /// Switch the owning lexer's state before the next token is requested.
    pub fn set_state(&self, state: S) {
        self.inner.source().set_state(state);
    }

    #[must_use]
    pub fn lexer(&self) -> &'a ContextualLexer<S> {
        self.inner.source()
    }

    #[must_use]
    pub fn line_counter(&self) -> &crate::lexer::LineCounter {
        self.inner.line_counter()
    }
}

impl<S: ParserState> Iterator for ContextualStream<'_, S> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<S: ParserState> std::iter::FusedIterator for ContextualStream<'_, S> {}

/// Fluent construction of a [`ContextualLexer`]
#[derive(Debug, Clone)]
pub struct ContextualLexerBuilder<S> {
    tokens: Vec<TokenDef>,
    states: Vec<(S, Vec<CompactString>)>,
    ignore: Vec<CompactString>,
    always_accept: Vec<CompactString>,
    config: LexerConfig,
}

impl<S> Default for ContextualLexerBuilder<S> {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            states: Vec::new(),
            ignore: Vec::new(),
            always_accept: Vec::new(),
            config: LexerConfig::default(),
        }
    }
}

impl<S: ParserState> ContextualLexerBuilder<S> {
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

    /// Declare the token names accepted in `state`
    #[must_use]
    pub fn state<N: AsRef<str>>(mut self, state: S, accepts: impl IntoIterator<Item = N>) -> Self {
        let accepts = accepts
            .into_iter()
            .map(|name| CompactString::new(name.as_ref()))
            .collect();
        self.states.push((state, accepts));
        self
    }

    #[must_use]
    pub fn ignore(mut self, name: &str) -> Self {
        self.ignore.push(CompactString::new(name));
        self
    }

    /// Accept `name` in every state
    #[must_use]
    pub fn always_accept(mut self, name: &str) -> Self {
        self.always_accept.push(CompactString::new(name));
        self
    }

    #[must_use]
    pub fn config(mut self, config: LexerConfig) -> Self {
        self.config = config;
        self
    }

    /// # Errors
    ///
    /// See [`ContextualLexer::new`].
    pub fn build(self) -> Result<ContextualLexer<S>, BuildError> {
        ContextualLexer::new(
            self.tokens,
            self.states,
            &self.ignore,
            &self.always_accept,
            &self.config,
        )
    }
}
