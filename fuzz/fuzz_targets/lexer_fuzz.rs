#![no_main]
use lexis::{Lexer, LexerBuilder, LexerConfig, TokenDef};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn lexers() -> &'static (Lexer, Lexer) {
    static LEXERS: OnceLock<(Lexer, Lexer)> = OnceLock::new();
    LEXERS.get_or_init(|| {
        let build = |config: LexerConfig| {
            LexerBuilder::new()
                .regex("NAME", "[a-zA-Z_][a-zA-Z0-9_]*")
                .regex("NUMBER", r"[0-9]+(\.[0-9]+)?")
                .regex("STRING", r#""([^"\\]|\\.)*""#)
                .regex("COMMENT", "#[^\n]*")
                .regex("WS", r"\s+")
                .literal("IF", "if")
                .literal("ELSE", "else")
                .literal("ARROW", "->")
                .literal("MINUS", "-")
                .token(TokenDef::literal("OP", "+").with_priority(2))
                .ignore("WS")
                .ignore("COMMENT")
                .config(config)
                .build()
                .expect("fuzz lexer should build")
        };
        (
            build(LexerConfig::default()),
            build(LexerConfig::default().with_max_groups(2)),
        )
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (whole, split) = lexers();

    let mut last_end = 0;
    let mut produced = Vec::new();
    for result in whole.lex(text) {
        match result {
            Ok(token) => {
                assert!(!token.text.is_empty());
                assert!(token.offset() >= last_end);
                last_end = token.range.end().to_usize();
                produced.push(token);
            }
            Err(err) => {
                assert!(err.offset() >= last_end);
                assert!(err.offset() < text.len());
                break;
            }
        }
    }

    let split_tokens: Vec<_> = split.lex(text).map_while(Result::ok).collect();
    assert_eq!(produced, split_tokens);
});
