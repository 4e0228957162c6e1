//! Token stream plumbing for the grammar
//!
//! The parser keeps at most one token of lookahead and lexes it lazily, so a
//! keyword-context change made by the grammar (re-enabling keywords after a
//! `{`) always takes effect before the next token is classified. Comments
//! met while lexing go straight into the builder at its current cursor.

use crate::slax::building::{BuildError, OutputTree, TreeBuilder};
use crate::slax::lexing::{ErrorSink, LexError, LexState, LexStep};
use crate::slax::token::{Token, TokenKind};

pub struct Parser<'a> {
    pub(crate) lexer: LexState<'a>,
    pub(crate) builder: TreeBuilder,
    lookahead: Option<Token>,
    exhausted: bool,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: LexState<'a>) -> Self {
        Self {
            lexer,
            builder: TreeBuilder::new(),
            lookahead: None,
            exhausted: false,
        }
    }

    /// The finished tree and every diagnostic reported along the way.
    pub fn finish(self) -> (OutputTree, ErrorSink) {
        (self.builder.finish(), self.lexer.into_errors())
    }

    pub fn error_count(&self) -> usize {
        self.lexer.error_count()
    }

    pub(crate) fn peek(&mut self) -> Result<Option<&Token>, LexError> {
        if self.lookahead.is_none() && !self.exhausted {
            match self.lexer.next_token(&mut self.builder)? {
                LexStep::Token(token) => self.lookahead = Some(token),
                LexStep::EndOfInput => self.exhausted = true,
            }
        }
        Ok(self.lookahead.as_ref())
    }

    pub(crate) fn peek_kind(&mut self) -> Result<Option<TokenKind>, LexError> {
        Ok(self.peek()?.map(|token| token.kind))
    }

    pub(crate) fn at(&mut self, kind: TokenKind) -> Result<bool, LexError> {
        Ok(self.peek_kind()? == Some(kind))
    }

    /// Consume the lookahead.
    pub(crate) fn advance(&mut self) -> Result<Option<Token>, LexError> {
        self.peek()?;
        let token = self.lookahead.take();
        if let Some(token) = &token {
            self.builder.set_line(token.line);
        }
        Ok(token)
    }

    /// Consume the lookahead if it is `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<bool, LexError> {
        if self.at(kind)? {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consume a `kind` token, or report what was found instead and skip
    /// the rest of the statement.
    pub(crate) fn expect(&mut self, kind: TokenKind, expecting: &str) -> Result<Option<Token>, LexError> {
        if self.at(kind)? {
            return self.advance();
        }
        self.unexpected(expecting)?;
        Ok(None)
    }

    /// Consume a `{` and turn keyword recognition back on for the block.
    pub(crate) fn open_block(&mut self) -> Result<bool, LexError> {
        if self.expect(TokenKind::OpenBrace, "'{'")?.is_none() {
            return Ok(false);
        }
        self.lexer.keywords_on();
        Ok(true)
    }

    /// Report the lookahead as a syntax error and resynchronize.
    pub(crate) fn unexpected(&mut self, expecting: &str) -> Result<(), LexError> {
        match self.peek()?.cloned() {
            Some(token) => {
                let message = format!(
                    "syntax error, unexpected {}, expecting {}",
                    token.kind.describe(),
                    expecting
                );
                self.lexer
                    .errors_mut()
                    .report(token.line, message, Some(token.text.as_str()));
            }
            None => {
                let line = self.lexer.line();
                let message = format!("syntax error, unexpected end of input, expecting {}", expecting);
                self.lexer.errors_mut().report(line, message, None);
            }
        }
        self.recover()
    }

    /// Skip to the end of the current statement: past the next `;` or a
    /// balanced `{ ... }`, or up to (not past) a `}` closing the enclosing
    /// block.
    pub(crate) fn recover(&mut self) -> Result<(), LexError> {
        let mut depth = 0usize;
        loop {
            match self.peek_kind()? {
                None => return Ok(()),
                Some(TokenKind::EndOfStatement) if depth == 0 => {
                    self.advance()?;
                    return Ok(());
                }
                Some(TokenKind::CloseBrace) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    self.advance()?;
                    depth -= 1;
                    if depth == 0 {
                        self.lexer.keywords_on();
                        return Ok(());
                    }
                }
                Some(TokenKind::OpenBrace) => {
                    self.advance()?;
                    depth += 1;
                }
                Some(_) => {
                    self.advance()?;
                }
            }
        }
    }

    /// Record a builder failure as a parse error.
    pub(crate) fn built<T>(&mut self, result: Result<T, BuildError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                let line = match self.builder.line() {
                    0 => self.lexer.line(),
                    line => line,
                };
                self.lexer.errors_mut().report(line, error.to_string(), None);
                None
            }
        }
    }

    /// Report an error against a token that was already consumed.
    pub(crate) fn error_at(&mut self, token: &Token, message: impl Into<String>) {
        self.lexer
            .errors_mut()
            .report(token.line, message, Some(token.text.as_str()));
    }
}
