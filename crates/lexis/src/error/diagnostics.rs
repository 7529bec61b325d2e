//! # Diagnostic Utilities
//!
//! Helpers for turning a [`LexError`] into a human-readable report:
//! surrounding source context, `file:line:col` prefixes and the list of
//! token types that would have been accepted.

use crate::error::LexError;
use crate::text::TextRange;
use compact_str::CompactString;
use std::fmt::Write;

/// Extract context around an error location
///
/// Returns (before_context, error_span, after_context) with up to `context_bytes`
/// bytes before and after the error, widened to the nearest character boundaries.
pub fn extract_context(
    source: &str,
    error_span: TextRange,
    context_bytes: usize,
) -> Option<(String, String, String)> {
    let start = error_span.start().to_usize();
    let end = error_span.end().to_usize();

    if start > source.len() || end > source.len() || start > end {
        return None;
    }
    if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        return None;
    }

    let mut context_start = start.saturating_sub(context_bytes);
    while !source.is_char_boundary(context_start) {
        context_start -= 1;
    }
    let mut context_end = (end + context_bytes).min(source.len());
    while !source.is_char_boundary(context_end) {
        context_end += 1;
    }

    let before = source[context_start..start].to_string();
    let error = source[start..end].to_string();
    let after = source[end..context_end].to_string();

    Some((before, error, after))
}

/// Format a list of token names as a human-readable string
#[must_use]
pub fn format_expected_list(expected: &[CompactString]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.to_string(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => {
            let mut result = init
                .iter()
                .map(CompactString::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            result.push_str(", or ");
            result.push_str(last);
            result
        }
    }
}

/// Format an error with surrounding context
pub fn format_error_with_context(error: &LexError, source: &str, context_bytes: usize) -> String {
    let mut result = String::new();

    let _ = write!(result, "{error}");

    if let Some((before, error_text, after)) = extract_context(source, error.span(), context_bytes)
    {
        result.push_str("\n\nContext:\n");
        let _ = write!(result, "  ...{before}[{error_text}]{after}...");
    }

    if let Some(allowed) = &error.allowed
        && !allowed.is_empty()
    {
        result.push_str("\n\nExpected one of: ");
        result.push_str(&format_expected_list(allowed));
    }

    result
}

/// Format error with line/column information
///
/// Lines are reported 1-based and columns 1-based, the way editors count them.
pub fn format_error_with_location(error: &LexError, filename: Option<&str>) -> String {
    let mut result = String::new();

    if let Some(filename) = filename {
        let _ = write!(result, "{filename}:");
    }
    let _ = write!(result, "{}:{}: {error}", error.line, error.column + 1);

    if let Some(allowed) = &error.allowed
        && !allowed.is_empty()
    {
        let _ = write!(result, " (expected {})", format_expected_list(allowed));
    }

    result
}
