//! Fatal lexer errors
//!
//! These abort the parse. Recoverable lexical problems (a stray character, an
//! unterminated string) are reported through the error sink instead and come
//! back as [`TokenKind::Error`](crate::slax::token::TokenKind::Error) tokens.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum LexError {
    /// Input ended inside a `/* ... */` comment
    UnterminatedComment { line: usize },
    /// The input buffer could not grow to the requested size
    OutOfMemory { requested: usize },
    /// Reading from the source failed
    Io { line: usize, source: io::Error },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedComment { line } | LexError::Io { line, .. } => *line,
            LexError::OutOfMemory { .. } => 0,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedComment { line } => {
                write!(f, "unterminated comment starting before line {}", line)
            }
            LexError::OutOfMemory { requested } => {
                write!(f, "out of memory growing input buffer to {} bytes", requested)
            }
            LexError::Io { line, source } => write!(f, "read failed near line {}: {}", line, source),
        }
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
