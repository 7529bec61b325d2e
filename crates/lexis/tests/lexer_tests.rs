//! Tests for lexer functionality

use lexis::lexer::{LexerBuilder, PatternFlags, TokenDef};
use lexis::{BuildError, LexErrorKind, Lexer, LexerConfig, Token};

fn kinds_and_texts(tokens: &[Token]) -> Vec<(&str, &str)> {
    tokens.iter().map(|t| (t.kind(), t.text())).collect()
}

fn calculator() -> Lexer {
    LexerBuilder::new()
        .regex("NUMBER", r"[0-9]+(\.[0-9]+)?")
        .literal("PLUS", "+")
        .literal("MINUS", "-")
        .literal("STAR", "*")
        .literal("POW", "**")
        .literal("LPAR", "(")
        .literal("RPAR", ")")
        .regex("WS", r"[ \t]+")
        .ignore("WS")
        .build()
        .expect("Failed to build lexer")
}

#[test]
fn test_tokenize_expression() {
    let tokens = calculator().tokenize("(1 + 2.5) ** 3").unwrap();
    assert_eq!(
        kinds_and_texts(&tokens),
        [
            ("LPAR", "("),
            ("NUMBER", "1"),
            ("PLUS", "+"),
            ("NUMBER", "2.5"),
            ("RPAR", ")"),
            ("POW", "**"),
            ("NUMBER", "3"),
        ]
    );
}

#[test]
fn test_longer_literal_tried_first() {
    let tokens = calculator().tokenize("2**3*4").unwrap();
    let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
    assert_eq!(kinds, ["NUMBER", "POW", "NUMBER", "STAR", "NUMBER"]);
}

#[test]
fn test_wider_literal_beats_single_character_class() {
    let lexer = LexerBuilder::new()
        .regex("ANY", ".")
        .literal("EQEQ", "==")
        .build()
        .unwrap();
    let tokens = lexer.tokenize("==").unwrap();
    assert_eq!(kinds_and_texts(&tokens), [("EQEQ", "==")]);
    let tokens = lexer.tokenize("=é").unwrap();
    assert_eq!(kinds_and_texts(&tokens), [("ANY", "="), ("ANY", "é")]);
}

#[test]
fn test_ascii_class_tracks_newlines() {
    let lexer = LexerBuilder::new().regex("PAIR", "[[:ascii:]]{2}").build().unwrap();
    assert!(lexer.newline_types().contains("PAIR"));
    let tokens = lexer.tokenize("a\nbc").unwrap();
    let positions: Vec<_> = tokens.iter().map(|t| (t.text(), t.line, t.column)).collect();
    assert_eq!(positions, [("a\n", 1, 0), ("bc", 2, 0)]);
}

#[test]
fn test_priority_beats_length() {
    let lexer = LexerBuilder::new()
        .token(TokenDef::literal("A", "if").with_priority(10))
        .token(TokenDef::literal("B", "ifx").with_priority(5))
        .token(TokenDef::literal("X", "x"))
        .build()
        .unwrap();
    let tokens = lexer.tokenize("ifx").unwrap();
    assert_eq!(kinds_and_texts(&tokens), [("A", "if"), ("X", "x")]);
}

#[test]
fn test_priority_beats_length_for_regex() {
    let lexer = Lexer::new::<&str>(
        vec![
            TokenDef::regex("SHORT", "[a-z]").with_priority(2),
            TokenDef::regex("LONG", "[a-z]+").with_priority(1),
        ],
        &[],
    )
    .unwrap();
    let tokens = lexer.tokenize("abc").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| t.kind() == "SHORT"));
}

#[test]
fn test_keyword_disambiguation() {
    let lexer = Lexer::new::<&str>(
        vec![
            TokenDef::regex("IDENT", "[a-z]+").with_priority(0),
            TokenDef::literal("IF", "if").with_priority(0),
        ],
        &[],
    )
    .unwrap();

    let tokens = lexer.tokenize("if").unwrap();
    assert_eq!(kinds_and_texts(&tokens), [("IF", "if")]);

    let tokens = lexer.tokenize("ifx").unwrap();
    assert_eq!(kinds_and_texts(&tokens), [("IDENT", "ifx")]);
}

#[test]
fn test_keyword_disambiguation_among_many() {
    let lexer = LexerBuilder::new()
        .regex("NAME", "[a-z_]+")
        .literal("IF", "if")
        .literal("ELSE", "else")
        .literal("WHILE", "while")
        .regex("WS", " +")
        .ignore("WS")
        .build()
        .unwrap();
    let tokens = lexer.tokenize("while x else if_ if").unwrap();
    assert_eq!(
        kinds_and_texts(&tokens),
        [
            ("WHILE", "while"),
            ("NAME", "x"),
            ("ELSE", "else"),
            ("NAME", "if_"),
            ("IF", "if"),
        ]
    );
}

#[test]
fn test_case_insensitive_keyword_kept_alongside_regex() {
    let lexer = LexerBuilder::new()
        .regex("NAME", "[a-z]+")
        .token(TokenDef::literal("SELECT", "select").with_flags(PatternFlags::parse("i").unwrap()))
        .regex("WS", " +")
        .ignore("WS")
        .build()
        .unwrap();
    assert!(lexer.tokens().iter().any(|def| def.name == "SELECT"));

    let tokens = lexer.tokenize("SELECT select name").unwrap();
    assert_eq!(
        kinds_and_texts(&tokens),
        [("SELECT", "SELECT"), ("SELECT", "select"), ("NAME", "name")]
    );
}

#[test]
fn test_ignore_suppression() {
    let lexer = LexerBuilder::new()
        .regex("IDENT", "[a-z]+")
        .regex("WHITESPACE", r"\s+")
        .ignore("WHITESPACE")
        .build()
        .unwrap();
    let tokens = lexer.tokenize("a  b").unwrap();
    assert_eq!(kinds_and_texts(&tokens), [("IDENT", "a"), ("IDENT", "b")]);
    assert_eq!(tokens[1].offset(), 3);
}

#[test]
fn test_line_column_tracking() {
    let lexer = LexerBuilder::new()
        .regex("IDENT", "[a-z]+")
        .regex("NL", r"\n")
        .ignore("NL")
        .build()
        .unwrap();
    let tokens = lexer.tokenize("a\nbb").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!((tokens[0].text(), tokens[0].line, tokens[0].column), ("a", 1, 0));
    assert_eq!((tokens[1].text(), tokens[1].line, tokens[1].column), ("bb", 2, 0));
}

#[test]
fn test_multiline_token_moves_lines() {
    let lexer = LexerBuilder::new()
        .regex("STRING", r#""[^"]*""#)
        .regex("NAME", "[a-z]+")
        .regex("WS", r"\s+")
        .ignore("WS")
        .build()
        .unwrap();
    let tokens = lexer.tokenize("\"a\nb\" c\n  d").unwrap();
    let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
    assert_eq!(positions, [(1, 0), (2, 3), (3, 2)]);
}

#[test]
fn test_error_positioning() {
    let lexer = LexerBuilder::new().regex("IDENT", "[a-z]+").build().unwrap();
    let err = lexer.tokenize("1+2").unwrap_err();
    assert_eq!(err.offset(), 0);
    assert_eq!((err.line, err.column), (1, 0));
    assert_eq!(err.kind(), &LexErrorKind::UnexpectedChar { char: '1' });
    assert_eq!(err.to_string(), "No token defined for: '1' in \"1+2\" at line 1 col 0");
}

#[test]
fn test_error_after_tokens() {
    let lexer = LexerBuilder::new()
        .regex("IDENT", "[a-z]+")
        .regex("NL", r"\n")
        .build()
        .unwrap();
    let results: Vec<_> = lexer.lex("ab\ncd$efghij").collect();
    assert_eq!(results.len(), 4);
    assert!(results[..3].iter().all(Result::is_ok));
    let err = results[3].as_ref().unwrap_err();
    assert_eq!((err.offset(), err.line, err.column), (5, 2, 2));
    assert_eq!(err.context, "$efgh");
}

#[test]
fn test_error_context_length_from_config() {
    let lexer = LexerBuilder::new()
        .regex("IDENT", "[a-z]+")
        .config(LexerConfig::default().with_context_len(2))
        .build()
        .unwrap();
    let err = lexer.tokenize("ab#cdef").unwrap_err();
    assert_eq!(err.context, "#c");
}

#[test]
fn test_unicode_offsets_are_bytes() {
    let lexer = LexerBuilder::new()
        .regex("WORD", r"\w+")
        .regex("WS", " ")
        .ignore("WS")
        .build()
        .unwrap();
    let tokens = lexer.tokenize("héllo wörld").unwrap();
    assert_eq!(tokens[1].offset(), "héllo ".len());
    assert_eq!(tokens[1].column, "héllo ".len());
}

#[test]
fn test_anchored_matching_sees_previous_text() {
    let lexer = LexerBuilder::new()
        .token(TokenDef::regex("START", "^#").with_priority(2))
        .regex("HASH", "#")
        .build()
        .unwrap();
    let tokens = lexer.tokenize("##").unwrap();
    let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
    assert_eq!(kinds, ["START", "HASH"]);
}

#[test]
fn test_group_limit_degradation() {
    let mut defs: Vec<_> = (0..40)
        .map(|i| TokenDef::literal(format!("KW{i:02}"), format!("kw{i:02}")))
        .collect();
    defs.push(TokenDef::regex("WS", " +"));

    let small = LexerBuilder::new()
        .tokens(defs.clone())
        .ignore("WS")
        .config(LexerConfig::default().with_max_groups(4))
        .build()
        .unwrap();
    let large = LexerBuilder::new().tokens(defs).ignore("WS").build().unwrap();

    assert!(small.matcher_count() > 1);
    assert_eq!(large.matcher_count(), 1);

    let input = "kw00 kw17 kw39 kw05 kw23";
    assert_eq!(small.tokenize(input).unwrap(), large.tokenize(input).unwrap());
}

#[test]
fn test_build_errors() {
    let err = Lexer::new::<&str>(vec![TokenDef::regex("OPT", "a?")], &[]).unwrap_err();
    assert!(matches!(err, BuildError::ZeroWidth { .. }));

    let err = Lexer::new::<&str>(vec![TokenDef::regex("BAD", "(a")], &[]).unwrap_err();
    assert!(matches!(err, BuildError::InvalidPattern { .. }));
    assert!(err.to_string().starts_with("Cannot compile token BAD"));

    let err = Lexer::new(vec![TokenDef::regex("A", "a")], &["B"]).unwrap_err();
    assert!(matches!(err, BuildError::UndeclaredIgnore { .. }));

    let err = Lexer::new::<&str>(
        vec![TokenDef::regex("A", "a"), TokenDef::literal("A", "b")],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, BuildError::DuplicateToken { .. }));
}

#[test]
fn test_lexer_is_shareable_across_threads() {
    let lexer = std::sync::Arc::new(calculator());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let lexer = std::sync::Arc::clone(&lexer);
            std::thread::spawn(move || lexer.tokenize(&format!("{i} + {i}")).unwrap().len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
}
