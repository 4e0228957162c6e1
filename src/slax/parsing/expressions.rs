//! Expression-level grammar
//!
//! Expressions are never parsed into a tree. They are collected as token
//! lists and rendered into attribute text by the builder. Only attribute
//! values on literal elements need structure: each item between `_`
//! operators is either a simple token or collapsed into one `Expression`
//! token so it can become a single `{...}` placeholder.

use super::parser::Parser;
use crate::slax::lexing::LexError;
use crate::slax::token::{render_text, Token, TokenKind, TokenList};

impl<'a> Parser<'a> {
    /// Collect tokens up to (not including) a statement boundary: `;`, `{`
    /// or `}`, or one of `stops` outside of parentheses and brackets.
    pub(crate) fn collect_value(&mut self, stops: &[TokenKind]) -> Result<TokenList, LexError> {
        let mut list = TokenList::new();
        let mut depth = 0usize;

        while let Some(kind) = self.peek_kind()? {
            match kind {
                TokenKind::EndOfStatement | TokenKind::OpenBrace | TokenKind::CloseBrace => break,
                _ if depth == 0 && stops.contains(&kind) => break,
                TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
                TokenKind::CloseParen | TokenKind::CloseBracket => depth = depth.saturating_sub(1),
                _ => {}
            }

            if let Some(token) = self.advance()? {
                if token.kind != TokenKind::Error {
                    list.push(token);
                }
            }
        }
        Ok(list)
    }

    /// Collect a test or select expression, dropping one pair of
    /// parentheses wrapped around the whole of it.
    pub(crate) fn condition(&mut self, expecting: &str) -> Result<Option<TokenList>, LexError> {
        let list = self.collect_value(&[])?;
        if list.is_empty() {
            self.unexpected(expecting)?;
            return Ok(None);
        }
        Ok(Some(strip_outer_parens(list)))
    }

    /// An attribute value on a literal element: items joined by `_`.
    pub(crate) fn attribute_value(&mut self) -> Result<Option<TokenList>, LexError> {
        let mut list = TokenList::new();
        loop {
            let Some(item) = self.value_item()? else {
                return Ok(None);
            };
            list.push(item);

            if !self.at(TokenKind::Underscore)? {
                return Ok(Some(list));
            }
            if let Some(underscore) = self.advance()? {
                list.push(underscore);
            }
        }
    }

    fn value_item(&mut self) -> Result<Option<Token>, LexError> {
        let Some(kind) = self.peek_kind()? else {
            self.unexpected("an attribute value")?;
            return Ok(None);
        };

        let mut list = TokenList::new();
        match kind {
            TokenKind::Quoted | TokenKind::Number => return self.advance(),
            TokenKind::OpenParen => list.extend(self.group()?),
            TokenKind::FunctionName | TokenKind::Keyword(_) => {
                self.take_into(&mut list)?;
                if self.at(TokenKind::OpenParen)? {
                    list.extend(self.group()?);
                }
                self.path_steps(&mut list)?;
            }
            TokenKind::At => {
                self.take_into(&mut list)?;
                self.take_into(&mut list)?;
                self.path_steps(&mut list)?;
            }
            TokenKind::Variable
            | TokenKind::Bare
            | TokenKind::Dot
            | TokenKind::DotDot
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::DoubleSlash => {
                if !matches!(kind, TokenKind::Slash | TokenKind::DoubleSlash) {
                    self.take_into(&mut list)?;
                }
                self.path_steps(&mut list)?;
            }
            _ => {
                self.unexpected("an attribute value")?;
                return Ok(None);
            }
        }

        Ok(Some(collapse(list)))
    }

    /// Predicates and `/step` continuations after a path start.
    fn path_steps(&mut self, list: &mut TokenList) -> Result<(), LexError> {
        loop {
            match self.peek_kind()? {
                Some(TokenKind::OpenBracket) => list.extend(self.group()?),
                Some(TokenKind::Slash | TokenKind::DoubleSlash) => {
                    self.take_into(list)?;
                    match self.peek_kind()? {
                        Some(TokenKind::At) => {
                            self.take_into(list)?;
                            self.take_into(list)?;
                        }
                        Some(TokenKind::FunctionName | TokenKind::Keyword(_)) => {
                            self.take_into(list)?;
                            if self.at(TokenKind::OpenParen)? {
                                list.extend(self.group()?);
                            }
                        }
                        Some(
                            TokenKind::Bare
                            | TokenKind::Asterisk
                            | TokenKind::Dot
                            | TokenKind::DotDot,
                        ) => self.take_into(list)?,
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// A parenthesized or bracketed run, delimiters included.
    fn group(&mut self) -> Result<TokenList, LexError> {
        let mut list = TokenList::new();
        let mut depth = 0usize;

        while let Some(kind) = self.peek_kind()? {
            if matches!(
                kind,
                TokenKind::EndOfStatement | TokenKind::OpenBrace | TokenKind::CloseBrace
            ) {
                break;
            }
            self.take_into(&mut list)?;
            match kind {
                TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
                TokenKind::CloseParen | TokenKind::CloseBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(list);
                    }
                }
                _ => {}
            }
        }

        let line = list.line();
        let message = "unbalanced parentheses in expression";
        let text = render_text(&list, false);
        self.lexer.errors_mut().report(line, message, Some(text.as_str()));
        Ok(list)
    }

    fn take_into(&mut self, list: &mut TokenList) -> Result<(), LexError> {
        if let Some(token) = self.advance()? {
            list.push(token);
        }
        Ok(())
    }
}

/// A single variable or name stays as it is; anything longer is rendered
/// into one `Expression` token.
fn collapse(list: TokenList) -> Token {
    if let Some(token) = list.as_single() {
        if matches!(token.kind, TokenKind::Variable | TokenKind::Bare) {
            return token.clone();
        }
    }
    Token::new(TokenKind::Expression, render_text(&list, false), list.line())
}

/// Remove one pair of parentheses enclosing the entire list.
pub(crate) fn strip_outer_parens(list: TokenList) -> TokenList {
    let tokens = list.tokens();
    let wrapped = tokens.len() >= 2
        && tokens[0].kind == TokenKind::OpenParen
        && tokens[tokens.len() - 1].kind == TokenKind::CloseParen
        && closing_paren(tokens) == Some(tokens.len() - 1);
    if !wrapped {
        return list;
    }
    let mut tokens: Vec<Token> = list.into_iter().collect();
    tokens.pop();
    tokens.remove(0);
    tokens.into()
}

/// Index of the paren closing the one at index 0.
fn closing_paren(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}
