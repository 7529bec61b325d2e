#![no_main]
use lexis::{ContextualLexer, TokenDef};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&switches, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };

    let lexer = ContextualLexer::builder()
        .token(TokenDef::regex("WORD", "[a-z]+"))
        .token(TokenDef::regex("DIGITS", "[0-9]+"))
        .token(TokenDef::regex("WS", "[ \n]+"))
        .state(0u8, ["WORD"])
        .state(1u8, ["DIGITS"])
        .state(2u8, ["WORD", "DIGITS"])
        .ignore("WS")
        .build()
        .expect("fuzz lexer should build");

    lexer.set_state(switches % 3);
    let mut stream = lexer.lex(text);
    let mut index = 0u32;
    while let Some(result) = stream.next() {
        let Ok(token) = result else {
            break;
        };
        let counter = stream.line_counter();
        assert!(counter.char_pos >= token.range.end().to_usize());
        stream.set_state(((u32::from(switches) >> (index % 8)) % 3) as u8);
        index += 1;
    }
});
