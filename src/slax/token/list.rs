//! Ordered token sequences assembled by the grammar.
//!
//! A list is owned by the expression that built it and is consumed when it is
//! rendered into the tree. Dropping a list (for instance while the grammar
//! recovers from an error) releases every token it holds.

use super::core::{Token, TokenKind};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn single(token: Token) -> Self {
        Self {
            tokens: vec![token],
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn extend(&mut self, other: TokenList) {
        self.tokens.extend(other.tokens);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// The only token of a one-token list.
    pub fn as_single(&self) -> Option<&Token> {
        match self.tokens.as_slice() {
            [token] => Some(token),
            _ => None,
        }
    }

    /// Is this list exactly one quoted string?
    pub fn is_single_quoted(&self) -> bool {
        self.as_single()
            .map(|t| t.kind == TokenKind::Quoted)
            .unwrap_or(false)
    }

    /// Split the list at `_` concatenation operators.
    ///
    /// Empty segments (a leading, trailing or doubled `_`) are dropped.
    pub fn segments(&self) -> Vec<&[Token]> {
        self.tokens
            .split(|t| t.kind == TokenKind::Underscore)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Source line of the first token, if any.
    pub fn line(&self) -> usize {
        self.tokens.first().map(|t| t.line).unwrap_or(0)
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TokenList {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
