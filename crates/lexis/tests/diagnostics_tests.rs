//! Tests for lexical error reporting

use lexis::error::diagnostics::{format_error_with_context, format_error_with_location};
use lexis::{ContextualLexer, LexerBuilder, TokenDef};

#[test]
fn test_location_report_for_plain_lexer() {
    let lexer = LexerBuilder::new()
        .regex("NAME", "[a-z]+")
        .regex("NL", r"\n")
        .build()
        .unwrap();
    let source = "abc\nd%e";
    let err = lexer.tokenize(source).unwrap_err();
    assert_eq!(
        format_error_with_location(&err, Some("main.txt")),
        "main.txt:2:2: No token defined for: '%' in \"%e\" at line 2 col 1"
    );
}

#[test]
fn test_context_report_lists_allowed_tokens() {
    let lexer = ContextualLexer::builder()
        .token(TokenDef::regex("NAME", "[a-z]+"))
        .token(TokenDef::regex("NUMBER", "[0-9]+"))
        .token(TokenDef::literal("EQ", "="))
        .state(0u8, ["NAME", "EQ"])
        .build()
        .unwrap();
    lexer.set_state(0);

    let source = "x=42";
    let err = lexer.tokenize(source).unwrap_err();
    let report = format_error_with_context(&err, source, 2);
    assert!(report.starts_with("No token defined for: '4'"));
    assert!(report.contains("...x=[4]2..."));
    assert!(report.ends_with("Expected one of: EQ or NAME"));
}

#[cfg(feature = "diagnostics")]
#[test]
fn test_miette_diagnostic_code() {
    use miette::Diagnostic;

    let lexer = LexerBuilder::new().regex("NAME", "[a-z]+").build().unwrap();
    let err = lexer.tokenize("1").unwrap_err();
    assert!(err.labels().is_some());

    let err = LexerBuilder::new().regex("EMPTY", "x*").build().unwrap_err();
    assert_eq!(
        err.code().map(|code| code.to_string()).as_deref(),
        Some("lexer::zero_width")
    );
}
