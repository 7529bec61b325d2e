//! Combined matchers
//!
//! A token set is compiled into one regex per batch of tokens: a disjunction of
//! named groups, one group per token, in token order. The engine's leftmost-first
//! alternation then picks the earliest token that matches at the current offset.
//!
//! Batches are bounded by [`LexerConfig::max_groups`]. When a batch needs more
//! capture groups than that (or outgrows the engine's size limit), the batch size
//! is halved and the remaining tokens are compiled with the smaller size.

use crate::config::LexerConfig;
use crate::error::BuildError;
use compact_str::CompactString;
use regex_automata::util::captures::Captures;
use regex_automata::util::pool::Pool;
use regex_automata::{Anchored, Input, PatternID, meta};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Group name prefix for token alternatives; the suffix is the batch index.
const GROUP_PREFIX: &str = "__lexis_t";

/// Matchers produced for one token set; almost always a single one.
pub type Matchers = SmallVec<[CompiledMatcher; 1]>;

/// How a combined matcher is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Match a prefix starting at the search offset
    Prefix,
    /// Match the whole haystack
    Whole,
}

/// Post-match handling attached to one alternative, fixed at build time
#[derive(Debug, Clone, Default)]
pub enum Disambiguation {
    /// Emit the alternative's own type
    #[default]
    None,
    /// Probe the matched text against literal tokens; an exact hit reclassifies
    /// the token to that literal's type.
    Unless(Matchers),
}

impl Disambiguation {
    /// Type the matched `text` should be reported as, if it differs.
    #[must_use]
    pub fn reclassify(&self, text: &str) -> Option<&CompactString> {
        match self {
            Self::None => None,
            Self::Unless(probes) => probes.iter().find_map(|probe| probe.match_whole(text)),
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Input to the matcher compiler: one token's name and engine-native regex
#[derive(Debug, Clone)]
pub struct MatcherEntry {
    pub name: CompactString,
    pub regexp: String,
    pub disambiguation: Disambiguation,
}

impl MatcherEntry {
    #[must_use]
    pub fn new(name: impl Into<CompactString>, regexp: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regexp: regexp.into(),
            disambiguation: Disambiguation::None,
        }
    }

    #[must_use]
    pub fn with_disambiguation(mut self, disambiguation: Disambiguation) -> Self {
        self.disambiguation = disambiguation;
        self
    }
}

/// One alternative of a combined matcher
#[derive(Debug, Clone)]
pub struct Alternative {
    /// Capture group index of this alternative
    pub group: usize,
    pub name: CompactString,
    pub disambiguation: Disambiguation,
}

impl Alternative {
    /// Token type for a match of this alternative on `text`
    #[must_use]
    pub fn kind_for<'a>(&'a self, text: &str) -> &'a CompactString {
        self.disambiguation.reclassify(text).unwrap_or(&self.name)
    }
}

type CapturesFn = Box<dyn Fn() -> Captures + Send + Sync>;

/// An ordered disjunction of token sub-patterns compiled into one regex
#[derive(Clone)]
pub struct CompiledMatcher {
    regex: meta::Regex,
    /// Capture slots reused across searches, shared by clones
    captures: Arc<Pool<Captures, CapturesFn>>,
    /// Sorted by group index, which is token order
    alternatives: Vec<Alternative>,
    mode: MatchMode,
}

impl fmt::Debug for CompiledMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMatcher")
            .field("regex", &self.regex)
            .field("alternatives", &self.alternatives)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

enum Attempt {
    Compiled(CompiledMatcher),
    OverCapacity,
}

impl CompiledMatcher {
    /// Match at exactly `pos` in `text`.
    ///
    /// Returns the end offset of the match and the alternative that produced it.
    #[must_use]
    pub fn match_at(&self, text: &str, pos: usize) -> Option<(usize, &Alternative)> {
        let input = Input::new(text)
            .span(pos..text.len())
            .anchored(Anchored::Yes);
        self.search(&input)
    }

    /// Match the whole of `text`, returning the name of the matching alternative.
    #[must_use]
    pub fn match_whole(&self, text: &str) -> Option<&CompactString> {
        let input = Input::new(text).anchored(Anchored::Yes);
        self.search(&input)
            .filter(|(end, _)| *end == text.len())
            .map(|(_, alt)| &alt.name)
    }

    fn search(&self, input: &Input<'_>) -> Option<(usize, &Alternative)> {
        let mut caps = self.captures.get();
        self.regex.search_captures(input, &mut caps);
        let end = caps.get_match()?.end();
        self.alternatives
            .iter()
            .find(|alt| caps.get_group(alt.group).is_some())
            .map(|alt| (end, alt))
    }

    #[must_use]
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Token name bound to capture group `group`
    #[must_use]
    pub fn slot_name(&self, group: usize) -> Option<&str> {
        self.alternatives
            .iter()
            .find(|alt| alt.group == group)
            .map(|alt| alt.name.as_str())
    }

    #[must_use]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    fn try_compile(
        batch: &[MatcherEntry],
        mode: MatchMode,
        config: &LexerConfig,
    ) -> Result<Attempt, BuildError> {
        let source = batch
            .iter()
            .enumerate()
            .map(|(idx, entry)| match mode {
                MatchMode::Prefix => format!("(?P<{GROUP_PREFIX}{idx}>{})", entry.regexp),
                MatchMode::Whole => format!("(?P<{GROUP_PREFIX}{idx}>(?:{})$)", entry.regexp),
            })
            .collect::<Vec<_>>()
            .join("|");

        let mut builder = meta::Regex::builder();
        if let Some(limit) = config.regex_size_limit {
            builder.configure(meta::Config::new().nfa_size_limit(Some(limit)));
        }
        let regex = match builder.build(&source) {
            Ok(regex) => regex,
            Err(err) if err.size_limit().is_some() => return Ok(Attempt::OverCapacity),
            Err(source) => return Err(BuildError::MatcherCompile { source }),
        };

        let group_info = regex.group_info();
        let explicit_groups = group_info.group_len(PatternID::ZERO).saturating_sub(1);
        if explicit_groups > config.max_groups {
            return Ok(Attempt::OverCapacity);
        }

        let alternatives = group_info
            .pattern_names(PatternID::ZERO)
            .enumerate()
            .filter_map(|(group, name)| {
                let idx = name?.strip_prefix(GROUP_PREFIX)?.parse::<usize>().ok()?;
                let entry = batch.get(idx)?;
                Some(Alternative {
                    group,
                    name: entry.name.clone(),
                    disambiguation: entry.disambiguation.clone(),
                })
            })
            .collect();

        let template = regex.create_captures();
        let create: CapturesFn = Box::new(move || template.clone());

        Ok(Attempt::Compiled(Self {
            regex,
            captures: Arc::new(Pool::new(create)),
            alternatives,
            mode,
        }))
    }
}

/// Compile `entries` into as few matchers as the group limit allows.
///
/// Concatenating the alternatives of the returned matchers reproduces the order of
/// `entries`. An empty entry list yields no matchers.
///
/// # Errors
///
/// Fails if a single entry cannot fit in a matcher on its own, or if the combined
/// source is rejected by the engine for a reason other than its size.
pub fn build_matchers(
    entries: &[MatcherEntry],
    mode: MatchMode,
    config: &LexerConfig,
) -> Result<Matchers, BuildError> {
    let mut matchers = Matchers::new();
    let mut rest = entries;
    let mut max_size = entries.len();

    while !rest.is_empty() {
        let take = max_size.min(rest.len());
        match CompiledMatcher::try_compile(&rest[..take], mode, config)? {
            Attempt::Compiled(matcher) => {
                matchers.push(matcher);
                rest = &rest[take..];
            }
            Attempt::OverCapacity if take > 1 => {
                max_size = take / 2;
                trace!(batch = take, retry = max_size, "matcher over capacity, splitting");
            }
            Attempt::OverCapacity => {
                return Err(BuildError::GroupLimit {
                    name: rest[0].name.clone(),
                    limit: config.max_groups,
                });
            }
        }
    }

    Ok(matchers)
}
