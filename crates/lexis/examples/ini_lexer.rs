//! Contextual lexing of an INI-style file
//!
//! Keys, section headers and values share characters, so each parser state
//! exposes only the tokens that may legally come next. The driver below plays
//! the parser: it switches state after every token it sees.
//!
//! Run with: `cargo run --example ini_lexer`

use lexis::error::diagnostics::format_error_with_location;
use lexis::{ContextualLexer, TokenDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum State {
    LineStart,
    AfterKey,
    Value,
    Section,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lexer = ContextualLexer::builder()
        .token(TokenDef::regex("KEY", "[A-Za-z_][A-Za-z0-9_.]*"))
        .token(TokenDef::literal("EQ", "="))
        .token(TokenDef::regex("VALUE", "[^\n;]+"))
        .token(TokenDef::literal("LBRACKET", "["))
        .token(TokenDef::literal("RBRACKET", "]"))
        .token(TokenDef::regex("SECTION", "[^\\]\n]+"))
        .token(TokenDef::regex("COMMENT", ";[^\n]*"))
        .token(TokenDef::regex("NEWLINE", "\n+"))
        .token(TokenDef::regex("SPACE", "[ \t]+"))
        .state(State::LineStart, ["KEY", "LBRACKET"])
        .state(State::AfterKey, ["EQ"])
        .state(State::Value, ["VALUE"])
        .state(State::Section, ["SECTION", "RBRACKET"])
        .ignore("SPACE")
        .ignore("COMMENT")
        .always_accept("NEWLINE")
        .build()?;

    println!("compiled {} state lexers", lexer.distinct_lexer_count());

    let source = "[server]\nhost = example.org ; primary\nport = 8080\n\n[client]\nretries = 3\n";
    lexer.set_state(State::LineStart);
    let mut stream = lexer.lex(source);

    while let Some(result) = stream.next() {
        let token = match result {
            Ok(token) => token,
            Err(err) => {
                eprintln!("{}", format_error_with_location(&err, Some("config.ini")));
                return Err(err.into());
            }
        };
        println!("{:>3}:{:<3} {token}", token.line, token.column);

        let next = match token.kind() {
            "KEY" => State::AfterKey,
            "EQ" => State::Value,
            "LBRACKET" | "SECTION" => State::Section,
            _ => State::LineStart,
        };
        stream.set_state(next);
    }

    Ok(())
}
