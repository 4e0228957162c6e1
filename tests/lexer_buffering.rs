//! Input buffering seen through the lexer
//!
//! Tokens must come out the same no matter how the source delivers its bytes
//! or how small the buffer starts out.

use std::io::{self, BufRead, Read};

use slax::slax::lexing::{DiscardComments, InputOptions, LexError, LexState, LexStep};
use slax::slax::token::{Token, TokenKind};

/// A reader that hands out at most `chunk` bytes per `fill_buf`.
struct Trickle<'a> {
    data: &'a [u8],
    pos: usize,
    chunk: usize,
}

impl<'a> Trickle<'a> {
    fn new(data: &'a str, chunk: usize) -> Self {
        Self {
            data: data.as_bytes(),
            pos: 0,
            chunk,
        }
    }
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for Trickle<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        let end = (self.pos + self.chunk).min(self.data.len());
        Ok(&self.data[self.pos..end])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.data.len());
    }
}

fn drain(state: &mut LexState<'_>) -> Vec<Token> {
    let mut tokens = Vec::new();
    while let LexStep::Token(token) = state.next_token(&mut DiscardComments).unwrap() {
        tokens.push(token);
    }
    tokens
}

fn small() -> InputOptions {
    InputOptions::new(16, 4, 16)
}

#[test]
fn quoted_string_spanning_a_refill() {
    let source = "expr \"hello\nworld\";\n";
    let mut state = LexState::with_options("span.slax", source.as_bytes(), small());
    let tokens = drain(&mut state);

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].kind, TokenKind::Quoted);
    assert_eq!(tokens[1].text, "\"hello\nworld\"");
    assert!(state.input().reads() >= 2);
    assert_eq!(state.error_count(), 0);
}

#[test]
fn token_longer_than_the_initial_buffer() {
    let long = "x".repeat(100);
    let source = format!("expr \"{}\";\n", long);
    let mut state = LexState::with_options("long.slax", source.as_bytes(), small());
    let tokens = drain(&mut state);

    assert_eq!(tokens[1].text, format!("\"{}\"", long));
    assert!(state.input().capacity() >= 102);
}

#[test]
fn chunk_size_does_not_change_tokens() {
    let source = "match item {\n    <a href=$x _ \"/\"> 'it\\'s';\n    expr \"abc\";\n}\n";
    let mut whole = LexState::new("whole.slax", source.as_bytes());
    let expected = drain(&mut whole);

    for chunk in 1..=9 {
        let reader = Trickle::new(source, chunk);
        let mut state = LexState::with_options("trickle.slax", reader, small());
        let tokens = drain(&mut state);
        assert_eq!(tokens, expected, "chunk size {}", chunk);
    }
}

const NAME_AFTER_STRING: &str = "expr \"a\nb\" _ abcdefghijklmnop;\n";

#[test]
fn name_after_multi_line_string_is_not_split() {
    let mut state = LexState::with_options("split.slax", NAME_AFTER_STRING.as_bytes(), small());
    let tokens = drain(&mut state);

    let bare: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Bare)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(bare, vec!["abcdefghijklmnop"]);
    assert_eq!(tokens.last().map(|t| t.line), Some(2));
}

#[test]
fn buffer_sizes_do_not_change_tokens() {
    let sources = [
        NAME_AFTER_STRING,
        "match item {\n    <a href=$x _ \"/\"> 'it\\'s';\n    expr \"abc\";\n}\n",
        "var $v = \"one\ntwo\nthree\" _ some-rather-long-identifier-name;\nexpr count   (item) div 2;\n",
    ];
    let options = [
        InputOptions::new(16, 4, 16),
        InputOptions::new(8, 2, 8),
        InputOptions::new(32, 4, 16),
        InputOptions::new(4, 1, 4),
        InputOptions::default(),
    ];

    for source in sources {
        let mut whole = LexState::new("whole.slax", source.as_bytes());
        let expected = drain(&mut whole);

        for option in options {
            for chunk in [1, 2, 3, 5, 7, 64] {
                let reader = Trickle::new(source, chunk);
                let mut state = LexState::with_options("trickle.slax", reader, option);
                let tokens = drain(&mut state);
                assert_eq!(tokens, expected, "{:?} with {:?}, chunk {}", source, option, chunk);
            }
        }
    }
}

#[test]
fn function_name_seen_across_a_read_boundary() {
    let source = "expr count   (item);\n";
    let mut state = LexState::with_options("call.slax", Trickle::new(source, 3), small());
    let tokens = drain(&mut state);

    assert_eq!(tokens[1].text, "count");
    assert_eq!(tokens[1].kind, TokenKind::FunctionName);
}

#[test]
fn lines_follow_token_positions() {
    let source = "expr a;\nexpr b;\nexpr c;\n";
    let mut state = LexState::with_options("lines.slax", source.as_bytes(), small());
    let tokens = drain(&mut state);

    let lines: Vec<(String, usize)> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Bare)
        .map(|t| (t.text.clone(), t.line))
        .collect();
    assert_eq!(
        lines,
        vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)]
    );
}

#[test]
fn unterminated_string_at_end_of_input() {
    let mut state = LexState::new("open.slax", "expr \"abc".as_bytes());
    let tokens = drain(&mut state);

    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Error));
    assert!(state.error_count() >= 1);
}

#[test]
fn unterminated_comment_is_fatal() {
    let mut state = LexState::with_options("comment.slax", "/* no end\nstill\n".as_bytes(), small());
    match state.next_token(&mut DiscardComments) {
        Err(LexError::UnterminatedComment { .. }) => {}
        other => panic!("expected an unterminated comment, got {:?}", other),
    }
}

#[test]
fn comments_reach_the_sink() {
    let mut comments: Vec<String> = Vec::new();
    let mut state = LexState::with_options(
        "comments.slax",
        "/* first */\n/* second\n   line */ var $x;\n".as_bytes(),
        small(),
    );
    let var = state.next_token(&mut comments).unwrap().into_token().unwrap();

    assert_eq!(var.text, "var");
    assert_eq!(comments, vec![" first ".to_string(), " second\n   line ".to_string()]);
}
