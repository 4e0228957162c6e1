//! Parse-time error sink
//!
//! Lexer, grammar driver and tree builder all report problems here. Every
//! report is logged immediately and counted; a parse with a non-zero count
//! discards its tree.

use std::fmt;

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source_name: String,
    pub line: usize,
    pub message: String,
    /// Text of the offending token, when there is one
    pub token: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.source_name, self.line, self.message)?;
        if let Some(token) = &self.token {
            write!(f, " before '{}'", token)?;
        }
        Ok(())
    }
}

/// Collects and counts diagnostics for one parse.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    source_name: String,
    diagnostics: Vec<Diagnostic>,
}

impl ErrorSink {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Record an error at `line`, optionally naming the offending token.
    pub fn report(&mut self, line: usize, message: impl Into<String>, token: Option<&str>) {
        let diagnostic = Diagnostic {
            source_name: self.source_name.clone(),
            line,
            message: message.into(),
            token: token.map(str::to_string),
        };
        tracing::error!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_and_formats() {
        let mut sink = ErrorSink::new("test.slax");
        sink.report(3, "syntax error", Some("}"));
        sink.report(4, "unterminated string", None);

        assert_eq!(sink.count(), 2);
        assert_eq!(
            sink.diagnostics()[0].to_string(),
            "test.slax:3: syntax error before '}'"
        );
        assert_eq!(
            sink.diagnostics()[1].to_string(),
            "test.slax:4: unterminated string"
        );
    }
}
