//! Keyword context
//!
//! Two flags decide which reserved words are recognized. After the
//! introducer of a construct whose tail is an expression or a name
//! (`var`, `match`, `if`, ...) statement keywords are off, so `$x = if`
//! reads `if` as a name. After `ns`, `call` and the space declarations every
//! keyword is off. A `;` turns both back on, and so does opening a block.

use crate::slax::token::{Keyword, TokenKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordContext {
    no_statement_keywords: bool,
    no_keywords: bool,
}

impl KeywordContext {
    pub fn statement_keywords_allowed(&self) -> bool {
        !self.no_statement_keywords && !self.no_keywords
    }

    pub fn expression_keywords_allowed(&self) -> bool {
        !self.no_keywords
    }

    pub fn suppress_statement_keywords(&mut self) {
        self.no_statement_keywords = true;
    }

    pub fn suppress_all_keywords(&mut self) {
        self.no_keywords = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Update the flags for a token that was just returned.
    pub fn observe(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::Keyword(
                Keyword::Var
                | Keyword::Param
                | Keyword::Mode
                | Keyword::Match
                | Keyword::Template
                | Keyword::Expr
                | Keyword::With
                | Keyword::CopyOf
                | Keyword::ForEach
                | Keyword::If,
            ) => self.suppress_statement_keywords(),
            TokenKind::Keyword(
                Keyword::Ns | Keyword::StripSpace | Keyword::PreserveSpace | Keyword::Call,
            ) => self.suppress_all_keywords(),
            TokenKind::EndOfStatement => self.reset(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut context = KeywordContext::default();
        assert!(context.statement_keywords_allowed());

        context.observe(TokenKind::Keyword(Keyword::Var));
        assert!(!context.statement_keywords_allowed());
        assert!(context.expression_keywords_allowed());

        context.observe(TokenKind::Keyword(Keyword::Ns));
        assert!(!context.expression_keywords_allowed());

        context.observe(TokenKind::Bare);
        assert!(!context.expression_keywords_allowed());

        context.observe(TokenKind::EndOfStatement);
        assert_eq!(context, KeywordContext::default());
    }

    #[test]
    fn test_other_keywords_leave_context_alone() {
        let mut context = KeywordContext::default();
        context.observe(TokenKind::Keyword(Keyword::ApplyTemplates));
        context.observe(TokenKind::Keyword(Keyword::Else));
        assert!(context.statement_keywords_allowed());
    }
}
