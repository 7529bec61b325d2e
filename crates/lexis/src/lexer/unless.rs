//! Literal/regex ambiguity resolution
//!
//! A regex token such as `NAME = /[a-z]+/` also matches the text of keyword literals
//! such as `IF = "if"`. Rather than relying on ordering, every regex token that fully
//! accepts some literal gets a [`Disambiguation::Unless`] probe: whenever it matches,
//! the matched text is tested against those literals and reclassified on an exact hit.
//!
//! Literals whose flags are a subset of the regex's flags are recovered entirely
//! through the probe and are dropped from the top-level token list.

use crate::config::LexerConfig;
use crate::error::BuildError;
use crate::lexer::builder::TokenDef;
use crate::lexer::matcher::{Disambiguation, MatchMode, MatcherEntry, build_matchers};
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use regex_automata::{Anchored, Input, meta};
use tracing::trace;

/// Token list with embedded literals removed, plus the probes to attach
pub(crate) struct Resolution {
    pub tokens: Vec<TokenDef>,
    pub disambiguations: HashMap<CompactString, Disambiguation, ahash::RandomState>,
}

/// Whether `regexp` matches the whole of `text` from its first byte
fn accepts_fully(regexp: &meta::Regex, text: &str) -> bool {
    let input = Input::new(text).anchored(Anchored::Yes);
    regexp.find(input).is_some_and(|m| m.end() == text.len())
}

pub(crate) fn resolve(tokens: Vec<TokenDef>, config: &LexerConfig) -> Result<Resolution, BuildError> {
    let (literals, regexes): (Vec<&TokenDef>, Vec<&TokenDef>) =
        tokens.iter().partition(|def| def.pattern.is_literal());

    let mut embedded = HashSet::with_hasher(ahash::RandomState::new());
    let mut disambiguations = HashMap::with_hasher(ahash::RandomState::new());

    for retok in regexes {
        let regexp = meta::Regex::new(&retok.pattern.to_regexp())
            .map_err(|source| BuildError::MatcherCompile { source })?;

        let unless: Vec<&TokenDef> = literals
            .iter()
            .copied()
            .filter(|strtok| accepts_fully(&regexp, strtok.pattern.value()))
            .collect();
        if unless.is_empty() {
            continue;
        }

        for strtok in &unless {
            if strtok.pattern.flags().is_subset_of(retok.pattern.flags()) {
                embedded.insert(strtok.name.clone());
            }
        }

        let entries: Vec<MatcherEntry> = unless
            .iter()
            .map(|strtok| MatcherEntry::new(strtok.name.clone(), strtok.pattern.to_regexp()))
            .collect();
        let probes = build_matchers(&entries, MatchMode::Whole, config)?;
        if probes.is_empty() {
            return Err(BuildError::EmptyDisambiguation {
                name: retok.name.clone(),
            });
        }

        trace!(
            token = %retok.name,
            literals = unless.len(),
            "installed literal disambiguation"
        );
        disambiguations.insert(retok.name.clone(), Disambiguation::Unless(probes));
    }

    let tokens = tokens
        .into_iter()
        .filter(|def| !embedded.contains(&def.name))
        .collect();

    Ok(Resolution {
        tokens,
        disambiguations,
    })
}
