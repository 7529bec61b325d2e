//! Tests for parser-driven contextual lexing

use lexis::{ContextualLexer, LexErrorKind, LexerConfig, TokenDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum State {
    S1,
    S2,
}

fn two_state_lexer() -> ContextualLexer<State> {
    ContextualLexer::builder()
        .token(TokenDef::regex("A", "[a-z]+"))
        .token(TokenDef::regex("B", "[0-9]+"))
        .state(State::S1, ["A"])
        .state(State::S2, ["B"])
        .build()
        .expect("Failed to build contextual lexer")
}

#[test]
fn test_switching_state_before_next_token() {
    let lexer = two_state_lexer();
    lexer.set_state(State::S1);
    let err = lexer.tokenize("42").unwrap_err();
    assert_eq!(err.unexpected_char(), Some('4'));

    lexer.set_state(State::S2);
    let tokens = lexer.tokenize("42").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind(), "B");
}

#[test]
fn test_state_change_applies_to_next_token_only() {
    let lexer = two_state_lexer();
    lexer.set_state(State::S1);
    let mut stream = lexer.lex("abc123");

    let first = stream.next().unwrap().unwrap();
    assert_eq!((first.kind(), first.text()), ("A", "abc"));

    stream.set_state(State::S2);
    let second = stream.next().unwrap().unwrap();
    assert_eq!((second.kind(), second.text()), ("B", "123"));
    assert_eq!(second.offset(), 3);
    assert!(stream.next().is_none());
}

#[test]
fn test_missing_state_change_fails_with_allowed_names() {
    let lexer = two_state_lexer();
    lexer.set_state(State::S1);
    let results: Vec<_> = lexer.lex("abc123").collect();
    assert_eq!(results.len(), 2);
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.offset(), 3);
    assert_eq!(err.kind(), &LexErrorKind::UnexpectedChar { char: '1' });
    let allowed: Vec<_> = err.allowed.iter().flatten().map(|name| name.as_str()).collect();
    assert_eq!(allowed, ["A"]);
}

#[test]
fn test_line_tracking_across_state_switches() {
    let lexer = ContextualLexer::builder()
        .token(TokenDef::regex("KEY", "[a-z]+"))
        .token(TokenDef::literal("COLON", ":"))
        .token(TokenDef::regex("TEXT", "[^\n]+"))
        .token(TokenDef::regex("NL", r"\n"))
        .token(TokenDef::regex("SP", " +"))
        .state("key", ["KEY", "COLON"])
        .state("value", ["TEXT"])
        .ignore("SP")
        .always_accept("NL")
        .build()
        .unwrap();

    lexer.set_state("key");
    let mut stream = lexer.lex("a: x y\nb: z");
    let mut seen = Vec::new();
    while let Some(token) = stream.next() {
        let token = token.unwrap();
        match token.kind() {
            "COLON" => stream.set_state("value"),
            "NL" => stream.set_state("key"),
            _ => {}
        }
        seen.push((token.kind.clone(), token.text.clone(), token.line, token.column));
    }

    let seen: Vec<_> = seen
        .iter()
        .map(|(kind, text, line, column)| (kind.as_str(), text.as_str(), *line, *column))
        .collect();
    assert_eq!(
        seen,
        [
            ("KEY", "a", 1, 0),
            ("COLON", ":", 1, 1),
            ("TEXT", "x y", 1, 3),
            ("NL", "\n", 1, 6),
            ("KEY", "b", 2, 0),
            ("COLON", ":", 2, 1),
            ("TEXT", "z", 2, 3),
        ]
    );
}

#[test]
fn test_keyword_disambiguation_per_state() {
    let lexer = ContextualLexer::builder()
        .token(TokenDef::regex("NAME", "[a-z]+"))
        .token(TokenDef::literal("IF", "if"))
        .token(TokenDef::regex("WS", " +"))
        .state(0, ["NAME", "IF"])
        .state(1, ["NAME"])
        .ignore("WS")
        .build()
        .unwrap();

    lexer.set_state(0);
    let kinds: Vec<_> = lexer
        .tokenize("if x")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(kinds, ["IF", "NAME"]);

    lexer.set_state(1);
    let kinds: Vec<_> = lexer
        .tokenize("if x")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(kinds, ["NAME", "NAME"]);
}

#[test]
fn test_custom_end_marker_is_excluded() {
    let lexer = ContextualLexer::builder()
        .token(TokenDef::literal("A", "a"))
        .state(0, ["A", "<eof>"])
        .config(LexerConfig::default().with_end_marker("<eof>"))
        .build()
        .unwrap();
    assert_eq!(lexer.lexer_for(&0).unwrap().accepted_names(), ["A"]);
}

#[test]
fn test_unset_state_error() {
    let lexer = two_state_lexer();
    let err = lexer.lex("").next().unwrap().unwrap_err();
    assert!(matches!(err.kind(), LexErrorKind::UnknownState { .. }));
    assert_eq!(err.unexpected_char(), None);
}
