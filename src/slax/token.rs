//! Core token types and helpers shared by the lexer, the grammar driver and the
//! tree builder.
//!
//! Token Layers
//!
//!     Lexical Tokens:
//!         One per call to the lexer: operators (one or two characters),
//!         keywords, bare names, quoted strings, numbers, variables and
//!         function names. See [core](core). Every token carries a copy of its
//!         source text, quotes included for quoted strings.
//!
//!     Token Lists:
//!         Expressions are assembled by the grammar as ordered sequences of
//!         lexical tokens before they are rendered into a single attribute or
//!         text value. See [list](list).
//!
//!     Expression Tokens:
//!         Tokens that are not produced by the lexer. The grammar collapses a
//!         parenthesized or function-call sub-expression into one pre-rendered
//!         [`TokenKind::Expression`] so attribute value templates can treat it
//!         as a single `{...}` placeholder.
//!
//! Rendering lists back into text (spacing, `concat()` for the `_` operator,
//! brace escaping, literal extraction) lives in [rendering](rendering).

pub mod core;
pub mod list;
pub mod rendering;

pub use self::core::{Keyword, Token, TokenKind};
pub use list::TokenList;
pub use rendering::{
    escape_braces, literal_content, render_compact, render_text, render_value, xpath_literal,
};
