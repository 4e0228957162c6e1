//! Building the output tree
//!
//! The output of a parse is an XSLT stylesheet held in an [`OutputTree`].
//! The grammar never touches the tree directly: it calls [`TreeBuilder`]
//! operations, which keep the element stack, resolve namespace prefixes,
//! render token lists into attribute text and apply the two structural
//! rewrites (collapsing single-branch conditionals and avoiding result tree
//! fragments in variables).
//!
//! Failures are returned as [`BuildError`] and never abort the parse.

pub mod builder;
pub mod error;
pub mod rewrites;
pub mod tree;
pub mod xsl;

pub use builder::TreeBuilder;
pub use error::BuildError;
pub use tree::{Attribute, Element, Namespace, Node, NodeId, NodeKind, OutputTree};
