//! Lexer state and the `next_token` entry point

use std::io::BufRead;

use super::context::KeywordContext;
use super::diagnostics::ErrorSink;
use super::error::LexError;
use super::input::{InputBuffer, InputOptions};
use crate::slax::token::{Keyword, Token, TokenKind, TokenList};
use crate::slax::trace::lex_trace;

/// Receiver for block comments found between statements.
pub trait CommentSink {
    /// `text` is the trimmed comment body, already padded with one space on
    /// each side.
    fn add_comment(&mut self, text: &str);
}

/// Drops every comment.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardComments;

impl CommentSink for DiscardComments {
    fn add_comment(&mut self, _text: &str) {}
}

impl CommentSink for Vec<String> {
    fn add_comment(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Result of one `next_token` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexStep {
    Token(Token),
    EndOfInput,
}

impl LexStep {
    pub fn into_token(self) -> Option<Token> {
        match self {
            LexStep::Token(token) => Some(token),
            LexStep::EndOfInput => None,
        }
    }
}

/// Everything the lexer carries between calls.
pub struct LexState<'a> {
    pub(crate) input: InputBuffer<'a>,
    pub(crate) last: Option<TokenKind>,
    pub(crate) context: KeywordContext,
    pub(crate) errors: ErrorSink,
    line: usize,
}

impl<'a> LexState<'a> {
    /// Lex `source`, reporting diagnostics against `name`.
    pub fn new(name: impl Into<String>, source: impl BufRead + 'a) -> Self {
        Self::with_options(name, source, InputOptions::default())
    }

    pub fn with_options(
        name: impl Into<String>,
        source: impl BufRead + 'a,
        options: InputOptions,
    ) -> Self {
        Self {
            input: InputBuffer::new(source, options),
            last: None,
            context: KeywordContext::default(),
            errors: ErrorSink::new(name),
            line: 1,
        }
    }

    /// Lex a complete XPath expression held in memory.
    ///
    /// Statement keywords start out suppressed, so only the word operators
    /// and node tests are recognized.
    pub fn from_expression(name: impl Into<String>, text: &str) -> LexState<'static> {
        let mut context = KeywordContext::default();
        context.suppress_statement_keywords();
        LexState {
            input: InputBuffer::from_text(text),
            last: None,
            context,
            errors: ErrorSink::new(name),
            line: 1,
        }
    }

    /// Return the next token, or `EndOfInput`.
    ///
    /// Comments encountered before the token are handed to `comments`.
    /// Malformed input produces an `Error` token and an entry in the error
    /// sink; only an unterminated comment, a failed read or a failed
    /// allocation end the scan with `Err`.
    pub fn next_token(&mut self, comments: &mut dyn CommentSink) -> Result<LexStep, LexError> {
        self.input.start = self.input.cur;

        let Some(mut kind) = self.scan(comments)? else {
            lex_trace!(line = self.line(), "end of input");
            return Ok(LexStep::EndOfInput);
        };
        self.line = self.input.start_line();

        if kind.is_operator_keyword() && !self.last_ends_value() {
            kind = TokenKind::Bare;
            if self.input.paren_follows(self.input.cur) {
                kind = TokenKind::FunctionName;
            }
        }

        // The name of a named template is never a call
        if kind == TokenKind::FunctionName
            && self.last == Some(TokenKind::Keyword(Keyword::Template))
        {
            kind = TokenKind::Bare;
        }

        self.last = Some(kind);

        if self.input.start == self.input.cur {
            if self.input.cur < self.input.len() {
                self.input.cur += 1;
            }
            kind = TokenKind::Error;
            self.last = Some(kind);
            let line = self.line();
            let text = self.input.token_text();
            self.errors
                .report(line, "unexpected character", Some(text.as_str()));
        }

        let text = self.input.token_text();
        lex_trace!(
            line = self.line(),
            kind = ?kind,
            text = %text,
            statement_keywords = self.context.statement_keywords_allowed(),
            keywords = self.context.expression_keywords_allowed(),
            "token"
        );

        self.context.observe(kind);
        Ok(LexStep::Token(Token::new(kind, text, self.line())))
    }

    /// Turn keyword recognition fully back on. The grammar calls this when a
    /// block opens.
    pub fn keywords_on(&mut self) {
        self.context.reset();
    }

    /// Line of the most recent token, counting from 1.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn last(&self) -> Option<TokenKind> {
        self.last
    }

    pub(crate) fn last_ends_value(&self) -> bool {
        self.last.is_some_and(|kind| kind.ends_value())
    }

    pub fn context(&self) -> &KeywordContext {
        &self.context
    }

    pub fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorSink {
        &mut self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.count()
    }

    pub fn input(&self) -> &InputBuffer<'a> {
        &self.input
    }

    pub fn into_errors(self) -> ErrorSink {
        self.errors
    }
}

/// Lex a whole expression into a token list.
pub fn tokenize_expression(text: &str) -> Result<TokenList, LexError> {
    let mut state = LexState::from_expression("expression", text);
    let mut tokens = TokenList::new();
    while let LexStep::Token(token) = state.next_token(&mut DiscardComments)? {
        tokens.push(token);
    }
    Ok(tokens)
}
