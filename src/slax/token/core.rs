//! Token kinds and the lexical token value.

use serde::Serialize;
use std::fmt;

/// Reserved words of the source language.
///
/// Whether a given occurrence is returned as a keyword depends on the keyword
/// context at the scan position; see [`crate::slax::lexing::keywords`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    And,
    ApplyImports,
    ApplyTemplates,
    Call,
    Comment,
    CopyOf,
    Div,
    Else,
    Exclude,
    Expr,
    Extension,
    ForEach,
    Id,
    If,
    Import,
    Include,
    Key,
    Match,
    Mod,
    Mode,
    Node,
    Ns,
    Or,
    Param,
    PreserveSpace,
    Priority,
    ProcessingInstruction,
    StripSpace,
    Template,
    Text,
    Var,
    Version,
    With,
}

impl Keyword {
    /// The reserved word as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::And => "and",
            Keyword::ApplyImports => "apply-imports",
            Keyword::ApplyTemplates => "apply-templates",
            Keyword::Call => "call",
            Keyword::Comment => "comment",
            Keyword::CopyOf => "copy-of",
            Keyword::Div => "div",
            Keyword::Else => "else",
            Keyword::Exclude => "exclude",
            Keyword::Expr => "expr",
            Keyword::Extension => "extension",
            Keyword::ForEach => "for-each",
            Keyword::Id => "id",
            Keyword::If => "if",
            Keyword::Import => "import",
            Keyword::Include => "include",
            Keyword::Key => "key",
            Keyword::Match => "match",
            Keyword::Mod => "mod",
            Keyword::Mode => "mode",
            Keyword::Node => "node",
            Keyword::Ns => "ns",
            Keyword::Or => "or",
            Keyword::Param => "param",
            Keyword::PreserveSpace => "preserve-space",
            Keyword::Priority => "priority",
            Keyword::ProcessingInstruction => "processing-instruction",
            Keyword::StripSpace => "strip-space",
            Keyword::Template => "template",
            Keyword::Text => "text",
            Keyword::Var => "var",
            Keyword::Version => "version",
            Keyword::With => "with",
        }
    }

    /// Binary operators spelled as words.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Keyword::And | Keyword::Or | Keyword::Div | Keyword::Mod
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Single character operators
    At,
    CloseBrace,
    CloseBracket,
    Comma,
    CloseParen,
    Dot,
    EndOfStatement,
    Equals,
    Greater,
    Less,
    Minus,
    OpenBrace,
    OpenBracket,
    OpenParen,
    Plus,
    Slash,
    /// `*` used as the multiplication operator
    Star,
    /// `*` used as a wildcard name test
    Asterisk,
    /// `_`, the string concatenation operator
    Underscore,
    VerticalBar,

    // Two character operators
    Assign,
    DoubleAmpersand,
    DoubleEquals,
    DotDot,
    DoubleSlash,
    DoubleVerticalBar,
    GreaterEquals,
    LessEquals,
    NotEquals,

    Keyword(Keyword),

    /// An unquoted name that is not a keyword or a function call
    Bare,
    /// A quoted string, quotes included in the text
    Quoted,
    Number,
    /// `$name`
    Variable,
    /// A bare name followed by `(`
    FunctionName,
    /// A pre-rendered sub-expression assembled by the grammar
    Expression,
    /// Malformed input; the text is what was skipped
    Error,
}

impl TokenKind {
    /// Can a token of this kind end a value expression?
    ///
    /// A `*` after such a token multiplies, and a word operator (`and`,
    /// `div`, ...) after such a token is an operator rather than a name.
    pub fn ends_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Asterisk
                | TokenKind::CloseBracket
                | TokenKind::CloseParen
                | TokenKind::Dot
                | TokenKind::DotDot
                | TokenKind::Bare
                | TokenKind::Number
                | TokenKind::Quoted
                | TokenKind::Variable
                | TokenKind::Expression
        )
    }

    /// Word operators that may have to be demoted to names.
    pub fn is_operator_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(k) if k.is_operator())
    }

    /// Short human readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(k) => format!("keyword '{}'", k),
            TokenKind::Bare => "name".to_string(),
            TokenKind::Quoted => "quoted string".to_string(),
            TokenKind::Number => "number".to_string(),
            TokenKind::Variable => "variable".to_string(),
            TokenKind::FunctionName => "function name".to_string(),
            TokenKind::Expression => "expression".to_string(),
            TokenKind::Error => "invalid input".to_string(),
            TokenKind::EndOfStatement => "';'".to_string(),
            other => match other.operator_text() {
                Some(text) => format!("'{}'", text),
                None => format!("{:?}", other),
            },
        }
    }

    /// Source spelling of an operator kind.
    pub fn operator_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::At => "@",
            TokenKind::CloseBrace => "}",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::CloseParen => ")",
            TokenKind::Dot => ".",
            TokenKind::EndOfStatement => ";",
            TokenKind::Equals => "=",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::Minus => "-",
            TokenKind::OpenBrace => "{",
            TokenKind::OpenBracket => "[",
            TokenKind::OpenParen => "(",
            TokenKind::Plus => "+",
            TokenKind::Slash => "/",
            TokenKind::Star | TokenKind::Asterisk => "*",
            TokenKind::Underscore => "_",
            TokenKind::VerticalBar => "|",
            TokenKind::Assign => ":=",
            TokenKind::DoubleAmpersand => "&&",
            TokenKind::DoubleEquals => "==",
            TokenKind::DotDot => "..",
            TokenKind::DoubleSlash => "//",
            TokenKind::DoubleVerticalBar => "||",
            TokenKind::GreaterEquals => ">=",
            TokenKind::LessEquals => "<=",
            TokenKind::NotEquals => "!=",
            _ => return None,
        };
        Some(text)
    }
}

/// A classified span of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Source line the token was read on (1-based, 0 for synthesized tokens)
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// A token built by the grammar rather than read from source.
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, 0)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
