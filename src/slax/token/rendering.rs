//! Rendering token lists back into text.
//!
//! Three renderings are used by the tree builder:
//!
//! - [`render_text`]: tokens joined with single spaces, except around path
//!   and bracket punctuation (`@ / // ( ) [ ]`), before `,`, and inside
//!   decimal numbers.
//! - [`render_value`]: like `render_text`, but a list containing `_`
//!   concatenation operators becomes a `concat(a, b, ...)` call so the value
//!   stays a single string.
//! - [`render_compact`]: tokens joined with nothing in between.
//!
//! Each takes a `braces` flag that doubles `{` and `}`, which is required
//! whenever the result lands in an attribute that is read as an attribute
//! value template.

use super::core::{Token, TokenKind};
use super::list::TokenList;
use crate::slax::lexing::keywords;

/// Render a list as one expression, tokens joined by the spacing rules.
pub fn render_text(list: &TokenList, braces: bool) -> String {
    join_tokens(list.tokens(), braces)
}

/// Render a list as one string-valued expression.
pub fn render_value(list: &TokenList, braces: bool) -> String {
    let segments = list.segments();
    if segments.len() <= 1 {
        return segments
            .first()
            .map(|segment| join_tokens(segment, braces))
            .unwrap_or_default();
    }

    let parts: Vec<String> = segments
        .iter()
        .map(|segment| join_tokens(segment, braces))
        .collect();
    format!("concat({})", parts.join(", "))
}

/// Render a list with no separators at all.
pub fn render_compact(list: &TokenList, braces: bool) -> String {
    list.iter().map(|t| token_text(t, braces)).collect()
}

/// Double every brace so it survives attribute value template expansion.
pub fn escape_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '{' || ch == '}' {
            out.push(ch);
        }
        out.push(ch);
    }
    out
}

/// The content of a quoted string token: quotes removed, escapes resolved.
///
/// Text that is not wrapped in a matching pair of quotes is unescaped as is.
pub fn literal_content(text: &str) -> String {
    let inner = strip_quotes(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// A quoted string token as an XPath string literal.
///
/// XPath has no escapes, so a token using backslash escapes is re-quoted with
/// whichever quote character its content does not contain. Content holding
/// both quote characters is split into a `concat()` of literals.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let content = literal_content(text);
    if !content.contains('"') {
        return format!("\"{}\"", content);
    }
    if !content.contains('\'') {
        return format!("'{}'", content);
    }

    let pieces: Vec<String> = content
        .split('"')
        .map(|piece| format!("\"{}\"", piece))
        .collect();
    format!("concat({})", pieces.join(", '\"', "))
}

fn strip_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn token_text(token: &Token, braces: bool) -> String {
    let text = match token.kind {
        TokenKind::Quoted => xpath_literal(&token.text),
        _ => token.text.clone(),
    };
    if braces {
        escape_braces(&text)
    } else {
        text
    }
}

fn join_tokens(tokens: &[Token], braces: bool) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;

    for token in tokens {
        if let Some(prev) = prev {
            if needs_space(prev, token) {
                out.push(' ');
            }
        }
        out.push_str(&token_text(token, braces));
        prev = Some(token);
    }
    out
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    use TokenKind::*;

    if matches!(
        prev.kind,
        At | Slash | DoubleSlash | OpenParen | OpenBracket
    ) {
        return false;
    }

    match next.kind {
        CloseParen | CloseBracket | OpenBracket | Slash | DoubleSlash | Comma => false,
        OpenParen => match prev.kind {
            FunctionName => false,
            Keyword(k) => !keywords::is_node_test(k),
            _ => true,
        },
        Dot => prev.kind != Number,
        Number => prev.kind != Dot,
        _ => true,
    }
}
