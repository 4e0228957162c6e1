//! # slax
//!
//! Front end for the SLAX scripting syntax: a context-sensitive lexer and an
//! incremental builder for the XSLT stylesheet tree the syntax stands for.
//!
//! File Layout
//!
//! src/slax
//!   ├── token      Token kinds, token lists and expression rendering
//!   ├── lexing     Input buffer, keywords, classifier and the error sink
//!   ├── building   Output tree, tree builder and its structural rewrites
//!   ├── parsing    Grammar driver, whole-parse failures and entry points
//!   └── formats    Serializers for the finished tree
//!
//! The grammar driver pulls tokens from [`slax::lexing::LexState`] and pushes
//! reductions into [`slax::building::TreeBuilder`]; nothing else talks to the
//! tree while a parse is running.
//!
//! For testing helpers, see the [testing module](slax::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod slax;

pub use slax::parsing::{parse_file, parse_source, parse_str, ParseFailed};
