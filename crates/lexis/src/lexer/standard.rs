use crate::config::LexerConfig;
use crate::error::{BuildError, LexError, LexErrorKind};
use crate::lexer::builder::{LexerBuilder, TokenDef};
use crate::lexer::matcher::{CompiledMatcher, MatchMode, MatcherEntry, Matchers, build_matchers};
use crate::lexer::pattern::Width;
use crate::lexer::stream::{LexStream, TokenSource};
use crate::lexer::token::Token;
use crate::lexer::unless;
use compact_str::CompactString;
use hashbrown::HashSet;
use std::cmp::Ordering;
use tracing::debug;

/// Set of token type names
pub type TypeSet = HashSet<CompactString, ahash::RandomState>;

/// A compiled, prioritized token set
///
/// Immutable once built; any number of sessions may lex with it concurrently.
#[derive(Debug, Clone)]
pub struct Lexer {
    tokens: Vec<TokenDef>,
    matchers: Matchers,
    newline_types: TypeSet,
    ignore_types: TypeSet,
    /// Every declared name, sorted, including literals recovered by disambiguation
    accepted: Vec<CompactString>,
    context_len: usize,
}

/// Matching order: priority, then maximum width, then literal length, then name.
fn token_order(a: &(TokenDef, Width), b: &(TokenDef, Width)) -> Ordering {
    let (a, a_width) = a;
    let (b, b_width) = b;
    let max_width = |width: &Width| width.max.unwrap_or(usize::MAX);
    b.priority
        .cmp(&a.priority)
        .then_with(|| max_width(b_width).cmp(&max_width(a_width)))
        .then_with(|| b.pattern.literal_len().cmp(&a.pattern.literal_len()))
        .then_with(|| a.name.cmp(&b.name))
}

fn validate(def: &TokenDef) -> Result<Width, BuildError> {
    let regexp = def.pattern.to_regexp();
    regex::Regex::new(&regexp).map_err(|source| BuildError::InvalidPattern {
        name: def.name.clone(),
        pattern: def.pattern.to_string(),
        source,
    })?;

    let width = def.pattern.width().map_err(|source| BuildError::PatternAnalysis {
        name: def.name.clone(),
        source,
    })?;
    if width.min == 0 {
        return Err(BuildError::ZeroWidth {
            name: def.name.clone(),
            pattern: def.pattern.to_string(),
        });
    }
    Ok(width)
}

impl Lexer {
    #[must_use]
    pub fn builder() -> LexerBuilder {
        LexerBuilder::new()
    }

    /// Build a lexer with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`Lexer::with_config`].
    pub fn new<I>(tokens: Vec<TokenDef>, ignore: &[I]) -> Result<Self, BuildError>
    where
        I: AsRef<str>,
    {
        Self::with_config(tokens, ignore, &LexerConfig::default())
    }

    /// Validate `tokens`, order them and compile their matchers.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, patterns that do not compile or may match the empty
    /// string, ignored names that are not declared, and matcher compilation failures.
    pub fn with_config<I>(
        tokens: Vec<TokenDef>,
        ignore: &[I],
        config: &LexerConfig,
    ) -> Result<Self, BuildError>
    where
        I: AsRef<str>,
    {
        let mut names = TypeSet::with_capacity_and_hasher(tokens.len(), ahash::RandomState::new());
        for def in &tokens {
            if !names.insert(def.name.clone()) {
                return Err(BuildError::DuplicateToken {
                    name: def.name.clone(),
                });
            }
        }

        let mut keyed = tokens
            .into_iter()
            .map(|def| validate(&def).map(|width| (def, width)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ignore_types = TypeSet::with_hasher(ahash::RandomState::new());
        for name in ignore {
            let name = name.as_ref();
            if !names.contains(name) {
                return Err(BuildError::UndeclaredIgnore { name: name.into() });
            }
            ignore_types.insert(CompactString::new(name));
        }

        let newline_types: TypeSet = keyed
            .iter()
            .filter(|(def, _)| def.pattern.may_contain_newline())
            .map(|(def, _)| def.name.clone())
            .collect();

        keyed.sort_by(token_order);
        let sorted = keyed.into_iter().map(|(def, _)| def).collect();

        let unless::Resolution {
            tokens,
            mut disambiguations,
        } = unless::resolve(sorted, config)?;

        let entries: Vec<MatcherEntry> = tokens
            .iter()
            .map(|def| {
                MatcherEntry::new(def.name.clone(), def.pattern.to_regexp())
                    .with_disambiguation(disambiguations.remove(&def.name).unwrap_or_default())
            })
            .collect();
        let matchers = build_matchers(&entries, MatchMode::Prefix, config)?;

        let mut accepted: Vec<CompactString> = names.into_iter().collect();
        accepted.sort_unstable();

        debug!(
            tokens = tokens.len(),
            embedded = accepted.len() - tokens.len(),
            matchers = matchers.len(),
            "built lexer"
        );

        Ok(Self {
            tokens,
            matchers,
            newline_types,
            ignore_types,
            accepted,
            context_len: config.context_len,
        })
    }

    /// Lazily tokenize `text`.
    ///
    /// Each call starts a fresh session at offset 0, line 1, column 0.
    #[must_use]
    pub fn lex<'a>(&'a self, text: &'a str) -> LexStream<'a, Self> {
        LexStream::new(self, text)
    }

    /// Tokenize the whole of `text` eagerly.
    ///
    /// # Errors
    ///
    /// Returns the first lexical error; tokens before it are discarded.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexError> {
        self.lex(text).collect()
    }

    /// Tokens in matching order, without literals recovered by disambiguation
    #[must_use]
    pub fn tokens(&self) -> &[TokenDef] {
        &self.tokens
    }

    #[must_use]
    pub fn matchers(&self) -> &[CompiledMatcher] {
        &self.matchers
    }

    #[must_use]
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    #[must_use]
    pub const fn newline_types(&self) -> &TypeSet {
        &self.newline_types
    }

    #[must_use]
    pub const fn ignore_types(&self) -> &TypeSet {
        &self.ignore_types
    }

    /// All token names this lexer can produce, sorted
    #[must_use]
    pub fn accepted_names(&self) -> &[CompactString] {
        &self.accepted
    }

    /// Whether matches of `name` are probed against literal tokens
    #[must_use]
    pub fn is_disambiguated(&self, name: &str) -> bool {
        self.matchers
            .iter()
            .flat_map(CompiledMatcher::alternatives)
            .any(|alt| alt.name == name && !alt.disambiguation.is_none())
    }

    #[must_use]
    pub const fn context_len(&self) -> usize {
        self.context_len
    }
}

impl TokenSource for Lexer {
    fn active_lexer(&self) -> Result<&Lexer, LexErrorKind> {
        Ok(self)
    }

    fn newline_types(&self) -> &TypeSet {
        &self.newline_types
    }

    fn ignore_types(&self) -> &TypeSet {
        &self.ignore_types
    }

    fn context_len(&self) -> usize {
        self.context_len
    }
}
