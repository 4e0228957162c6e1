//! Whole-parse failure

use std::fmt;
use std::io;

use crate::slax::lexing::{Diagnostic, LexError};

/// Why `parse_source` produced no tree.
#[derive(Debug)]
pub enum ParseFailed {
    /// Parsing finished but reported errors; the tree was discarded.
    Errors {
        name: String,
        count: usize,
        diagnostics: Vec<Diagnostic>,
    },
    /// Parsing stopped early.
    Fatal { name: String, error: LexError },
    /// The source could not be opened.
    Open { name: String, source: io::Error },
}

impl ParseFailed {
    /// Number of errors reported, counting a fatal stop as one.
    pub fn error_count(&self) -> usize {
        match self {
            ParseFailed::Errors { count, .. } => *count,
            ParseFailed::Fatal { .. } | ParseFailed::Open { .. } => 1,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ParseFailed::Errors { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

impl fmt::Display for ParseFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailed::Errors { name, count, .. } => write!(
                f,
                "{}: {} error{} detected during parsing",
                name,
                count,
                if *count == 1 { "" } else { "s" }
            ),
            ParseFailed::Fatal { name, error } => write!(f, "{}: {}", name, error),
            ParseFailed::Open { name, source } => write!(f, "{}: cannot open: {}", name, source),
        }
    }
}

impl std::error::Error for ParseFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseFailed::Errors { .. } => None,
            ParseFailed::Fatal { error, .. } => Some(error),
            ParseFailed::Open { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_pluralizes() {
        let one = ParseFailed::Errors {
            name: "a.slax".into(),
            count: 1,
            diagnostics: Vec::new(),
        };
        let many = ParseFailed::Errors {
            name: "a.slax".into(),
            count: 3,
            diagnostics: Vec::new(),
        };

        assert_eq!(one.to_string(), "a.slax: 1 error detected during parsing");
        assert_eq!(many.to_string(), "a.slax: 3 errors detected during parsing");
    }

    #[test]
    fn test_fatal_display() {
        let failed = ParseFailed::Fatal {
            name: "b.slax".into(),
            error: LexError::UnterminatedComment { line: 4 },
        };
        assert_eq!(
            failed.to_string(),
            "b.slax: unterminated comment starting before line 4"
        );
        assert_eq!(failed.error_count(), 1);
    }
}
