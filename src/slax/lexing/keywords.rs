//! Operator and keyword tables
//!
//! The operator lookup tables are built once per process on first use and
//! are read-only afterwards. The keyword table is static data; its order
//! matters, because the first entry whose text matches decides the outcome
//! even when that entry is not allowed in the current context.

use once_cell::sync::Lazy;

use super::context::KeywordContext;
use super::input::InputBuffer;
use crate::slax::token::{Keyword, TokenKind};

/// One-character operators, in table order.
pub const SINGLE_WIDE: &[(u8, TokenKind)] = &[
    (b'@', TokenKind::At),
    (b'}', TokenKind::CloseBrace),
    (b']', TokenKind::CloseBracket),
    (b',', TokenKind::Comma),
    (b')', TokenKind::CloseParen),
    (b'.', TokenKind::Dot),
    (b';', TokenKind::EndOfStatement),
    (b'=', TokenKind::Equals),
    (b'>', TokenKind::Greater),
    (b'<', TokenKind::Less),
    (b'-', TokenKind::Minus),
    (b'{', TokenKind::OpenBrace),
    (b'[', TokenKind::OpenBracket),
    (b'(', TokenKind::OpenParen),
    (b'+', TokenKind::Plus),
    (b'/', TokenKind::Slash),
    (b'*', TokenKind::Star),
    (b'_', TokenKind::Underscore),
    (b'|', TokenKind::VerticalBar),
];

/// Two-character operators. At most one entry per first character.
pub const DOUBLE_WIDE: &[(u8, u8, TokenKind)] = &[
    (b':', b'=', TokenKind::Assign),
    (b'&', b'&', TokenKind::DoubleAmpersand),
    (b'=', b'=', TokenKind::DoubleEquals),
    (b'.', b'.', TokenKind::DotDot),
    (b'/', b'/', TokenKind::DoubleSlash),
    (b'|', b'|', TokenKind::DoubleVerticalBar),
    (b'>', b'=', TokenKind::GreaterEquals),
    (b'<', b'=', TokenKind::LessEquals),
    (b'!', b'=', TokenKind::NotEquals),
];

const STATEMENT: u8 = 1 << 0;
const EXPRESSION: u8 = 1 << 1;
const NODE_TEST: u8 = 1 << 2;

/// A reserved word and the contexts it is recognized in.
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub keyword: Keyword,
    flags: u8,
}

impl KeywordEntry {
    const fn new(keyword: Keyword, flags: u8) -> Self {
        Self { keyword, flags }
    }

    pub fn text(&self) -> &'static str {
        self.keyword.as_str()
    }

    /// Recognized where statements may start.
    pub fn is_statement(&self) -> bool {
        self.flags & STATEMENT != 0
    }

    /// Recognized inside expressions.
    pub fn is_expression(&self) -> bool {
        self.flags & EXPRESSION != 0
    }

    /// Recognized only when followed by `(`.
    pub fn is_node_test(&self) -> bool {
        self.flags & NODE_TEST != 0
    }
}

pub static KEYWORD_TABLE: &[KeywordEntry] = &[
    KeywordEntry::new(Keyword::And, EXPRESSION),
    KeywordEntry::new(Keyword::ApplyImports, STATEMENT),
    KeywordEntry::new(Keyword::ApplyTemplates, STATEMENT),
    KeywordEntry::new(Keyword::Call, STATEMENT),
    KeywordEntry::new(Keyword::Comment, STATEMENT | NODE_TEST),
    KeywordEntry::new(Keyword::CopyOf, STATEMENT),
    KeywordEntry::new(Keyword::Div, EXPRESSION),
    KeywordEntry::new(Keyword::Exclude, STATEMENT),
    KeywordEntry::new(Keyword::Else, STATEMENT),
    KeywordEntry::new(Keyword::Expr, STATEMENT),
    KeywordEntry::new(Keyword::Extension, STATEMENT),
    KeywordEntry::new(Keyword::ForEach, STATEMENT),
    KeywordEntry::new(Keyword::Id, NODE_TEST),
    KeywordEntry::new(Keyword::If, STATEMENT),
    KeywordEntry::new(Keyword::Import, STATEMENT),
    KeywordEntry::new(Keyword::Include, STATEMENT),
    KeywordEntry::new(Keyword::Key, NODE_TEST),
    KeywordEntry::new(Keyword::Match, STATEMENT),
    KeywordEntry::new(Keyword::Mod, EXPRESSION),
    KeywordEntry::new(Keyword::Mode, STATEMENT),
    KeywordEntry::new(Keyword::Node, NODE_TEST),
    KeywordEntry::new(Keyword::Ns, STATEMENT),
    KeywordEntry::new(Keyword::Or, EXPRESSION),
    KeywordEntry::new(Keyword::Param, STATEMENT),
    KeywordEntry::new(Keyword::PreserveSpace, STATEMENT),
    KeywordEntry::new(Keyword::Priority, STATEMENT),
    KeywordEntry::new(Keyword::ProcessingInstruction, NODE_TEST),
    KeywordEntry::new(Keyword::StripSpace, STATEMENT),
    KeywordEntry::new(Keyword::Template, STATEMENT),
    KeywordEntry::new(Keyword::Text, NODE_TEST),
    KeywordEntry::new(Keyword::Var, STATEMENT),
    KeywordEntry::new(Keyword::Version, STATEMENT),
    KeywordEntry::new(Keyword::With, STATEMENT),
];

/// ASCII-indexed operator lookup.
struct OperatorTables {
    single: [Option<TokenKind>; 128],
    double: [Option<(u8, TokenKind)>; 128],
}

impl OperatorTables {
    fn build() -> Self {
        let mut single = [None; 128];
        for &(ch, kind) in SINGLE_WIDE {
            single[ch as usize] = Some(kind);
        }

        let mut double = [None; 128];
        for &(first, second, kind) in DOUBLE_WIDE {
            debug_assert!(
                double[first as usize].is_none(),
                "two operators start with {:?}",
                first as char
            );
            double[first as usize] = Some((second, kind));
        }

        Self { single, double }
    }
}

static OPERATORS: Lazy<OperatorTables> = Lazy::new(OperatorTables::build);

/// The one-character operator spelled `ch`, if any.
pub fn single_wide(ch: u8) -> Option<TokenKind> {
    OPERATORS.single.get(ch as usize).copied().flatten()
}

/// The two-character operator spelled `first second`, if any.
pub fn double_wide(first: u8, second: u8) -> Option<TokenKind> {
    match OPERATORS.double.get(first as usize).copied().flatten() {
        Some((expected, kind)) if expected == second => Some(kind),
        _ => None,
    }
}

pub fn entry(keyword: Keyword) -> Option<&'static KeywordEntry> {
    KEYWORD_TABLE.iter().find(|entry| entry.keyword == keyword)
}

/// Is `keyword` a node test (`node()`, `text()`, ...)?
pub fn is_node_test(keyword: Keyword) -> bool {
    entry(keyword).is_some_and(KeywordEntry::is_node_test)
}

/// Match a keyword at `pos` under the given context.
///
/// The first table entry spelled at `pos` (on a name boundary) decides: it is
/// returned when its flags are allowed by `context`, or when it is a node
/// test followed by `(` on the same line, and otherwise no keyword is
/// recognized at all.
pub fn match_keyword(input: &InputBuffer<'_>, pos: usize, context: &KeywordContext) -> Option<Keyword> {
    let entry = KEYWORD_TABLE
        .iter()
        .find(|entry| input.word_at(pos, entry.text()))?;

    if context.statement_keywords_allowed() && entry.is_statement() {
        return Some(entry.keyword);
    }
    if context.expression_keywords_allowed() && entry.is_expression() {
        return Some(entry.keyword);
    }
    if entry.is_node_test() && input.paren_follows_on_line(pos + entry.text().len()) {
        return Some(entry.keyword);
    }
    None
}
