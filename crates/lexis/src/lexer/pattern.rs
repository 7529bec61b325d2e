//! Token patterns: literal strings and regular expressions.

use crate::error::BuildError;
use compact_str::CompactString;
use regex_syntax::hir::{Hir, HirKind};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inline matching flags of a pattern.
///
/// Named booleans rather than a bitset, mirroring the regex inline flag letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct PatternFlags {
    /// `i`
    pub ignore_case: bool,
    /// `m`
    pub multi_line: bool,
    /// `s`
    pub dot_matches_new_line: bool,
    /// `x`
    pub verbose: bool,
}

impl PatternFlags {
    /// No flags set
    pub const NONE: Self = Self {
        ignore_case: false,
        multi_line: false,
        dot_matches_new_line: false,
        verbose: false,
    };

    /// Parse flag letters such as `"is"`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownFlag`] for a letter outside `imsx`.
    pub fn parse(letters: &str) -> Result<Self, BuildError> {
        let mut flags = Self::NONE;
        for flag in letters.chars() {
            match flag {
                'i' => flags.ignore_case = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_matches_new_line = true,
                'x' => flags.verbose = true,
                _ => return Err(BuildError::UnknownFlag { flag }),
            }
        }
        Ok(flags)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.ignore_case || self.multi_line || self.dot_matches_new_line || self.verbose)
    }

    /// Whether every flag set here is also set in `other`
    #[must_use]
    pub const fn is_subset_of(self, other: Self) -> bool {
        (!self.ignore_case || other.ignore_case)
            && (!self.multi_line || other.multi_line)
            && (!self.dot_matches_new_line || other.dot_matches_new_line)
            && (!self.verbose || other.verbose)
    }
}

impl fmt::Display for PatternFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, letter) in [
            (self.ignore_case, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.verbose, 'x'),
        ] {
            if set {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// What a token type matches
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Pattern {
    /// Exact text
    Literal {
        value: CompactString,
        flags: PatternFlags,
    },
    /// Regular expression source in the engine's syntax
    Regex {
        source: CompactString,
        flags: PatternFlags,
    },
}

/// Minimum and maximum match length of a pattern, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Width {
    pub min: usize,
    /// `None` when the pattern is unbounded
    pub max: Option<usize>,
}

impl Pattern {
    #[must_use]
    pub fn literal(value: impl Into<CompactString>) -> Self {
        Self::Literal {
            value: value.into(),
            flags: PatternFlags::NONE,
        }
    }

    #[must_use]
    pub fn regex(source: impl Into<CompactString>) -> Self {
        Self::Regex {
            source: source.into(),
            flags: PatternFlags::NONE,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, new_flags: PatternFlags) -> Self {
        match &mut self {
            Self::Literal { flags, .. } | Self::Regex { flags, .. } => *flags = new_flags,
        }
        self
    }

    /// The literal text or regex source, as written
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Literal { value, .. } => value,
            Self::Regex { source, .. } => source,
        }
    }

    #[must_use]
    pub const fn flags(&self) -> PatternFlags {
        match self {
            Self::Literal { flags, .. } | Self::Regex { flags, .. } => *flags,
        }
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Render the pattern as engine-native regex source.
    ///
    /// Literals are escaped; flags become an inline group `(?flags:...)`.
    #[must_use]
    pub fn to_regexp(&self) -> String {
        let body = match self {
            Self::Literal { value, .. } => regex::escape(value),
            Self::Regex { source, .. } => source.to_string(),
        };
        let flags = self.flags();
        if flags.is_empty() {
            body
        } else {
            format!("(?{flags}:{body})")
        }
    }

    /// Length of the literal text in characters; regexes count as zero.
    ///
    /// Used as a tie-break when ordering tokens.
    #[must_use]
    pub fn literal_len(&self) -> usize {
        match self {
            Self::Literal { value, .. } => value.chars().count(),
            Self::Regex { .. } => 0,
        }
    }

    /// Compute the match width in characters.
    ///
    /// A regex that can never match reports a minimum of zero.
    ///
    /// # Errors
    ///
    /// Returns the syntax error if the regex cannot be parsed.
    pub fn width(&self) -> Result<Width, regex_syntax::Error> {
        match self {
            Self::Literal { value, .. } => {
                let len = value.chars().count();
                Ok(Width {
                    min: len,
                    max: Some(len),
                })
            }
            Self::Regex { .. } => {
                let hir = regex_syntax::Parser::new().parse(&self.to_regexp())?;
                Ok(hir_width(&hir).unwrap_or(Width { min: 0, max: Some(0) }))
            }
        }
    }

    /// Whether a match of this pattern may contain a newline.
    ///
    /// Exact for literals. For regexes this is a textual check over the rendered
    /// source that over-approximates: any escape, class or flag that could reach
    /// `\n` counts, even when it cannot in practice.
    #[must_use]
    pub fn may_contain_newline(&self) -> bool {
        match self {
            Self::Literal { value, .. } => value.contains('\n'),
            Self::Regex { .. } => regexp_has_newline(&self.to_regexp()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, flags } => write!(f, "{value:?}{flags}"),
            Self::Regex { source, flags } => write!(f, "/{source}/{flags}"),
        }
    }
}

/// Character width of `hir`, or `None` when it can never match.
///
/// The engine's own length properties count UTF-8 bytes, so a class such as `.`
/// would report a maximum of 4. Here every class counts as one character.
fn hir_width(hir: &Hir) -> Option<Width> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => Some(Width { min: 0, max: Some(0) }),
        HirKind::Literal(literal) => {
            let len = literal.0.iter().filter(|&&byte| byte & 0xC0 != 0x80).count();
            Some(Width {
                min: len,
                max: Some(len),
            })
        }
        HirKind::Class(class) => class.minimum_len().map(|_| Width { min: 1, max: Some(1) }),
        HirKind::Capture(capture) => hir_width(&capture.sub),
        HirKind::Repetition(rep) => {
            let Some(sub) = hir_width(&rep.sub) else {
                return (rep.min == 0).then_some(Width { min: 0, max: Some(0) });
            };
            let min = sub.min.saturating_mul(rep.min as usize);
            let max = match (sub.max, rep.max) {
                (Some(0), _) => Some(0),
                (Some(len), Some(count)) => Some(len.saturating_mul(count as usize)),
                _ => None,
            };
            Some(Width { min, max })
        }
        HirKind::Concat(parts) => parts.iter().try_fold(
            Width { min: 0, max: Some(0) },
            |acc, part| {
                let width = hir_width(part)?;
                Some(Width {
                    min: acc.min.saturating_add(width.min),
                    max: acc.max.zip(width.max).map(|(a, b)| a.saturating_add(b)),
                })
            },
        ),
        HirKind::Alternation(branches) => branches
            .iter()
            .filter_map(hir_width)
            .reduce(|a, b| Width {
                min: a.min.min(b.min),
                max: a.max.zip(b.max).map(|(a, b)| a.max(b)),
            }),
    }
}

/// Escapes and class syntax whose match set may include a newline
const NEWLINE_MARKERS: &[&str] = &[
    "\\n", "\\s", "\\D", "\\W", "\\p", "\\P", "\\x", "\\u", "\\U", "\\t-", "\\a-", "[^",
    "[:",
];

fn regexp_has_newline(regexp: &str) -> bool {
    regexp.contains('\n')
        || regexp.chars().any(|c| c < '\n')
        || NEWLINE_MARKERS.iter().any(|marker| regexp.contains(marker))
        || (regexp.contains('.') && enables_dot_all(regexp))
}

/// Whether any inline flag group in `regexp` turns on `s`.
fn enables_dot_all(regexp: &str) -> bool {
    regexp.match_indices("(?").any(|(idx, _)| {
        regexp[idx + 2..]
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .any(|c| c == 's')
    })
}
