//! Parsing
//!
//!     Drives the lexer and the tree builder over one source and decides
//!     whether the result is usable.
//!
//!     errors       `ParseFailed`, the whole-parse failure.
//!     parser       Token lookahead, error reporting and resynchronization.
//!     statements   Statement forms of the stylesheet grammar.
//!     expressions  Value collection and attribute value items.
//!
//!     Every syntax and tree-construction error is reported to the lexer's
//!     error sink as it happens and parsing goes on, so one pass finds as
//!     many errors as it can. A tree is only handed back when the count is
//!     zero. Unterminated comments, read failures and allocation failures
//!     stop the parse at once.

pub mod errors;
pub mod expressions;
pub mod parser;
pub mod statements;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub use errors::ParseFailed;
pub use parser::Parser;

use crate::slax::building::OutputTree;
use crate::slax::lexing::{InputOptions, LexState};

/// Parse a stylesheet read from `reader`, reporting against `name`.
pub fn parse_source(name: &str, reader: impl BufRead) -> Result<OutputTree, ParseFailed> {
    parse_source_with(name, reader, InputOptions::default())
}

/// Like [`parse_source`], with an explicit input buffer policy.
pub fn parse_source_with(
    name: &str,
    reader: impl BufRead,
    options: InputOptions,
) -> Result<OutputTree, ParseFailed> {
    let lexer = LexState::with_options(name, reader, options);
    let mut parser = Parser::new(lexer);

    if let Err(error) = parser.stylesheet() {
        tracing::error!(source = name, line = error.line(), "{}", error);
        return Err(ParseFailed::Fatal {
            name: name.to_string(),
            error,
        });
    }

    let (tree, errors) = parser.finish();
    if errors.is_empty() {
        tracing::debug!(source = name, nodes = tree.node_count(), "parse complete");
        return Ok(tree);
    }

    let failed = ParseFailed::Errors {
        name: name.to_string(),
        count: errors.count(),
        diagnostics: errors.diagnostics().to_vec(),
    };
    tracing::error!("{}", failed);
    Err(failed)
}

/// Parse a stylesheet held in memory.
pub fn parse_str(name: &str, text: &str) -> Result<OutputTree, ParseFailed> {
    parse_source(name, text.as_bytes())
}

/// Parse a stylesheet file; `-` reads standard input.
pub fn parse_file(path: impl AsRef<Path>) -> Result<OutputTree, ParseFailed> {
    parse_file_with(path, InputOptions::default())
}

pub fn parse_file_with(
    path: impl AsRef<Path>,
    options: InputOptions,
) -> Result<OutputTree, ParseFailed> {
    let path = path.as_ref();
    if path == Path::new("-") {
        let stdin = io::stdin();
        return parse_source_with("-", stdin.lock(), options);
    }

    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| ParseFailed::Open {
        name: name.clone(),
        source,
    })?;
    parse_source_with(&name, BufReader::new(file), options)
}
