//! Tree construction errors
//!
//! None of these abort a parse. The session reports each one to the error
//! sink, which counts it, and carries on without the node.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Not usable as an element or attribute name
    InvalidName { name: String },
    /// The node the operation targets is a text or comment node
    NotAnElement { name: String },
    /// A rewrite was asked to act on a node with no parent
    Detached { name: String },
    /// `close`/`pop` with only the root on the stack
    CloseRoot,
    /// The prefix is already declared on the current element
    DuplicateNamespace { prefix: Option<String> },
    /// No value tokens were given
    EmptyValue { name: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidName { name } => write!(f, "could not make node: invalid name '{}'", name),
            BuildError::NotAnElement { name } => write!(f, "could not add '{}': target is not an element", name),
            BuildError::Detached { name } => write!(f, "could not rewrite '{}': node is not in the tree", name),
            BuildError::CloseRoot => write!(f, "element stack underflow: cannot close the stylesheet root"),
            BuildError::DuplicateNamespace { prefix: Some(prefix) } => {
                write!(f, "namespace prefix '{}' is already declared here", prefix)
            }
            BuildError::DuplicateNamespace { prefix: None } => {
                write!(f, "default namespace is already declared here")
            }
            BuildError::EmptyValue { name } => write!(f, "missing value for '{}'", name),
        }
    }
}

impl std::error::Error for BuildError {}
