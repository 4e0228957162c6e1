//! Property-based tests for the lexer and parser
//!
//! Whatever the input, lexing must terminate with every token consuming
//! input, and parsing must either build a tree or report why it could not.

use proptest::prelude::*;
use slax::slax::lexing::{DiscardComments, InputOptions, LexError, LexState, LexStep};
use slax::slax::token::Token;
use slax::{parse_str, ParseFailed};
use std::io::{BufReader, Cursor};

/// Lex all of `source`, returning the token texts or the fatal error.
fn lex_all(source: &str) -> Result<Vec<String>, LexError> {
    let mut state = LexState::new("prop", Cursor::new(source.to_string()));
    let mut texts = Vec::new();
    while let LexStep::Token(token) = state.next_token(&mut DiscardComments)? {
        texts.push(token.text);
    }
    Ok(texts)
}

fn lex_tokens(mut state: LexState<'_>) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    while let LexStep::Token(token) = state.next_token(&mut DiscardComments)? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Multi-line strings next to names long enough to straddle small reads.
fn buffer_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{8,40}",
        "\"[a-z \n]{0,30}\"",
        "'[a-z \n]{0,30}'",
        "\\$[a-z]{1,12}",
        "[a-z]{2,10}\\(",
        Just("_".to_string()),
        Just(";".to_string()),
        Just("expr".to_string()),
    ]
}

fn buffer_source() -> impl Strategy<Value = String> {
    let separator = prop::sample::select(vec![" ", "\n", "   ", " \n\t"]);
    prop::collection::vec((buffer_fragment(), separator), 0..30).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(fragment, separator)| fragment + separator)
            .collect()
    })
}

/// Statement-shaped fragments, glued together in any order.
fn slax_fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "version 1.0;",
        "ns foo = \"urn:foo\";",
        "match / {",
        "template t($a) {",
        "}",
        "{",
        "var $x = 1;",
        "var $y {",
        "<out>",
        "<foo:bar id=$x _ \"s\">",
        "\"text\";",
        "if $x {",
        "else",
        "for-each (item) {",
        "apply-templates;",
        "call t($a = 2);",
        "with $a;",
        "mode \"m\";",
        "priority -1;",
        "copy-of .;",
        "/* note */",
        "count(a/b[@c]) * 2",
        ";",
        "(",
        ")",
        "=",
        "!",
        "'open",
    ])
}

fn slax_source() -> impl Strategy<Value = String> {
    prop::collection::vec(slax_fragment(), 0..40).prop_map(|parts| parts.join("\n"))
}

proptest! {
    #[test]
    fn test_lexing_terminates_and_consumes(input in "[ -~\n\t]{0,200}") {
        match lex_all(&input) {
            Ok(texts) => {
                prop_assert!(texts.len() <= input.len());
                prop_assert!(texts.iter().all(|text| !text.is_empty()));
                let consumed: usize = texts.iter().map(String::len).sum();
                prop_assert!(consumed <= input.len());
            }
            Err(LexError::UnterminatedComment { .. }) => {
                prop_assert!(input.contains("/*"));
            }
            Err(other) => prop_assert!(false, "unexpected lexer failure: {}", other),
        }
    }

    #[test]
    fn test_token_text_appears_in_order(input in "[a-z0-9$_.:() ;{}<>=\"-]{0,120}") {
        let Ok(texts) = lex_all(&input) else {
            return Ok(());
        };
        let mut rest = input.as_str();
        for text in texts {
            let Some(at) = rest.find(text.as_str()) else {
                return Err(TestCaseError::fail(format!("{:?} not found in {:?}", text, rest)));
            };
            rest = &rest[at + text.len()..];
        }
    }

    #[test]
    fn test_buffer_size_does_not_change_tokens(
        source in buffer_source(),
        chunk in 1usize..12,
        size in 4usize..40,
    ) {
        let expected = lex_tokens(LexState::new("whole", Cursor::new(source.clone())))?;
        let reader = BufReader::with_capacity(chunk, source.as_bytes());
        let options = InputOptions::new(size, size / 4, size);
        let tokens = lex_tokens(LexState::with_options("chunked", reader, options))?;
        prop_assert_eq!(tokens, expected);
    }

    #[test]
    fn test_parse_never_panics(source in slax_source()) {
        match parse_str("prop.slax", &source) {
            Ok(tree) => prop_assert!(tree.node_count() >= 1),
            Err(ParseFailed::Errors { count, diagnostics, .. }) => {
                prop_assert!(count > 0);
                prop_assert_eq!(count, diagnostics.len());
            }
            Err(ParseFailed::Fatal { .. }) => {}
            Err(ParseFailed::Open { .. }) => prop_assert!(false, "string input cannot fail to open"),
        }
    }
}
