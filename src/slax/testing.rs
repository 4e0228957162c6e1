//! Testing utilities for output tree assertions
//!
//! Tree-shape tests go through [`assert_tree`] rather than indexing into the
//! arena by hand. The fluent API names what a test cares about (element
//! names, attribute values, namespace declarations, text) and reports the
//! path to a failing node along with a summary of its children.
//!
//! ```rust,ignore
//! use slax::slax::testing::assert_tree;
//!
//! let tree = slax::parse_str("t.slax", "match / { <out> \"hi\"; }")?;
//! assert_tree(&tree)
//!     .xsl("stylesheet")
//!     .child(0, |template| {
//!         template
//!             .xsl("template")
//!             .attribute("match", "/")
//!             .child(0, |out| out.element("out").child(0, |text| text.text("hi")));
//!     });
//! ```

mod tree_assertions;

pub use tree_assertions::{assert_tree, NodeAssertion};
