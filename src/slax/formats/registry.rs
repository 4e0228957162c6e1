//! Named writers for a built stylesheet
//!
//! The command line picks an output by name (`--format xml`, `treeviz`,
//! `json`, `yaml`). Every name maps to one [`Formatter`] held by a
//! [`FormatRegistry`]; unknown names come back as
//! [`FormatError::FormatNotFound`].

use crate::slax::building::OutputTree;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No writer is registered under the requested name
    FormatNotFound(String),
    /// The writer could not render the tree (json and yaml encoding)
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Renders an XSLT output tree as text.
pub trait Formatter: Send + Sync {
    /// Key used by `--format`
    fn name(&self) -> &str;

    fn serialize(&self, tree: &OutputTree) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// A registry with no writers; see [`with_defaults`](Self::with_defaults).
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Add `formatter` under its name. A later writer with the same name wins.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Render `tree` with the writer registered as `format`.
    pub fn serialize(&self, tree: &OutputTree, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(tree)
    }

    /// Registered names in sorted order, as `slax list-formats` prints them.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry with the built-in formats; xml indents with `indent`.
    pub fn with_indent(indent: &str) -> Self {
        let mut registry = Self::new();
        registry.register(super::XmlFormatter::new(indent));
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry
    }

    pub fn with_defaults() -> Self {
        Self::with_indent(super::xml::DEFAULT_INDENT)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
