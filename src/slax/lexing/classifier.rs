//! Raw token classification
//!
//! `scan` skips whitespace and comments, then recognizes exactly one token
//! starting at `cur`, in this order: two-character operators, one-character
//! operators, quoted strings, variables, keywords, numbers and finally bare
//! names. A bare name directly followed by `(` is a function name.
//!
//! The caller (`next_token`) applies the lookback rules that need the
//! previous token and turns zero-length matches into errors.

use super::comments;
use super::error::LexError;
use super::input::{is_bare, is_var, Fill};
use super::keywords;
use super::state::{CommentSink, LexState};
use crate::slax::token::TokenKind;

impl<'a> LexState<'a> {
    /// Classify the next token. `None` means the input is exhausted.
    pub(crate) fn scan(
        &mut self,
        comments: &mut dyn CommentSink,
    ) -> Result<Option<TokenKind>, LexError> {
        loop {
            self.input.start = self.input.cur;
            if self.input.cur >= self.input.len() && self.input.fill(true)? == Fill::Exhausted {
                return Ok(None);
            }

            self.input.skip_whitespace();
            if self.input.cur >= self.input.len() {
                continue;
            }

            if self.context.statement_keywords_allowed()
                && comments::is_comment_start(&self.input, self.input.cur)
            {
                self.input.start = self.input.cur;
                comments::drain_comment(&mut self.input)?;
                if let Some(body) = comments::comment_body(&self.input) {
                    comments.add_comment(&body);
                }
                continue;
            }

            break;
        }

        self.input.start = self.input.cur;
        let start = self.input.cur;
        let Some(ch1) = self.input.byte(start) else {
            return Ok(None);
        };
        let ch2 = self.input.byte(start + 1).unwrap_or(0);

        if let Some(kind) = keywords::double_wide(ch1, ch2) {
            self.input.cur += 2;
            return Ok(Some(kind));
        }

        if let Some(kind) = keywords::single_wide(ch1) {
            self.input.cur += 1;
            match kind {
                TokenKind::Star => {
                    let kind = if self.last_ends_value() {
                        TokenKind::Star
                    } else {
                        TokenKind::Asterisk
                    };
                    return Ok(Some(kind));
                }
                // `_` glued to a name is part of the name
                TokenKind::Underscore if self.input.byte(self.input.cur).is_some_and(is_bare) => {}
                other => return Ok(Some(other)),
            }
        } else {
            if ch1 == b'\'' || ch1 == b'"' {
                return self.scan_quoted(ch1).map(Some);
            }

            if ch1 == b'$' {
                self.input.cur += 1;
                while self.input.byte(self.input.cur).is_some_and(is_var) {
                    self.input.cur += 1;
                }
                return Ok(Some(TokenKind::Variable));
            }

            if is_bare(ch1) {
                self.input.buffer_past_name()?;
            }
            let start = self.input.start;
            if let Some(keyword) = keywords::match_keyword(&self.input, start, &self.context) {
                self.input.cur += keyword.as_str().len();
                return Ok(Some(TokenKind::Keyword(keyword)));
            }

            if ch1.is_ascii_digit() {
                while self.input.byte(self.input.cur).is_some_and(|ch| ch.is_ascii_digit()) {
                    self.input.cur += 1;
                }
                return Ok(Some(TokenKind::Number));
            }
        }

        self.input.buffer_past_name()?;
        self.scan_bare();
        if self.input.cur > self.input.start && self.input.paren_follows(self.input.cur) {
            return Ok(Some(TokenKind::FunctionName));
        }
        Ok(Some(TokenKind::Bare))
    }

    /// Consume a bare name. `:*` is allowed so `prefix:*` is one token.
    fn scan_bare(&mut self) {
        while let Some(ch) = self.input.byte(self.input.cur) {
            let wildcard = ch == b'*'
                && self.input.cur > self.input.start
                && self.input.byte(self.input.cur - 1) == Some(b':');
            if !is_bare(ch) && !wildcard {
                break;
            }
            self.input.cur += 1;
        }
    }

    /// Consume a quoted string, refilling without a boundary requirement
    /// when the closing quote has not been buffered yet.
    fn scan_quoted(&mut self, quote: u8) -> Result<TokenKind, LexError> {
        self.input.cur += 1;

        loop {
            let Some(ch) = self.next_string_byte()? else {
                let line = self.input.start_line();
                let text = self.input.token_text();
                self.errors
                    .report(line, "unterminated string", Some(text.as_str()));
                return Ok(TokenKind::Error);
            };
            self.input.cur += 1;

            if ch == quote {
                self.input.settle()?;
                return Ok(TokenKind::Quoted);
            }
            if ch == b'\\' {
                if self.next_string_byte()?.is_none() {
                    continue;
                }
                self.input.cur += 1;
            }
        }
    }

    fn next_string_byte(&mut self) -> Result<Option<u8>, LexError> {
        if self.input.cur >= self.input.len() && self.input.fill(false)? == Fill::Exhausted {
            return Ok(None);
        }
        Ok(self.input.byte(self.input.cur))
    }
}
