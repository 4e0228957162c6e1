//! Lexing
//!
//!     The lexer turns a streaming character source into one classified token
//!     per call. Recognition is context sensitive: the same word can be a
//!     keyword in statement position and a plain name inside an expression,
//!     and `*`, `_` and bare words need one token of lookback or one character
//!     of lookahead to classify.
//!
//! Layers
//!
//!     input       Growable, shiftable byte buffer over a line-oriented source.
//!     keywords    Process-wide operator and keyword tables, built once.
//!     context     The two keyword-suppression flags and their transitions.
//!     comments    Block comment extraction into the output tree.
//!     classifier  Raw classification of the next token in the buffer.
//!     state       `LexState`, the caller-facing `next_token` entry point.
//!
//!     The grammar driver owns a `LexState` and passes a [`CommentSink`] (the
//!     tree builder) on every call so comments land at the current cursor.

pub mod classifier;
pub mod comments;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod keywords;
pub mod state;

pub use context::KeywordContext;
pub use diagnostics::{Diagnostic, ErrorSink};
pub use error::LexError;
pub use input::{Fill, InputBuffer, InputOptions};
pub use state::{tokenize_expression, CommentSink, DiscardComments, LexState, LexStep};
