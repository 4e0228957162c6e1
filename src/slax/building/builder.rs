//! Tree builder
//!
//! The grammar drives the builder one reduction at a time. Every operation
//! acts relative to the cursor, the element on top of the element stack:
//! `open`/`push_xsl` create a child and make it the cursor, `close`/`pop`
//! return to the parent, and everything else adds to the cursor in place.
//!
//! The stack is never empty: the `xsl:stylesheet` root is created by
//! [`TreeBuilder::new`] and sits at the bottom until [`TreeBuilder::finish`].

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::BuildError;
use super::tree::{Element, Namespace, NodeId, NodeKind, OutputTree};
use super::xsl;
use crate::slax::lexing::CommentSink;
use crate::slax::token::{
    escape_braces, literal_content, render_compact, render_text, render_value, TokenKind,
    TokenList,
};

static QNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}_][\p{L}\p{N}._-]*(?::[\p{L}_][\p{L}\p{N}._-]*)?$")
        .expect("qualified name pattern is valid")
});

fn check_name(name: &str) -> Result<(), BuildError> {
    if QNAME.is_match(name) {
        Ok(())
    } else {
        Err(BuildError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Split `prefix:local`.
fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

pub struct TreeBuilder {
    tree: OutputTree,
    stack: Vec<NodeId>,
    xsl_ns: Namespace,
    line: usize,
    text_as_element: bool,
    temp_count: u32,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// A builder holding the `xsl:stylesheet version="1.0"` root.
    pub fn new() -> Self {
        let xsl_ns = Namespace::new(Some(xsl::XSL_PREFIX), xsl::XSL_NS);
        let mut root = Element::new(xsl::ELT_STYLESHEET, Some(xsl_ns.clone()), 0);
        root.ns_defs.push(xsl_ns.clone());
        root.set_attribute(xsl::ATT_VERSION, xsl::XSL_VERSION);

        let tree = OutputTree::new(root);
        let stack = vec![tree.root()];
        Self {
            tree,
            stack,
            xsl_ns,
            line: 0,
            text_as_element: false,
            temp_count: 0,
        }
    }

    /// Source line recorded on elements created from now on.
    pub fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Always wrap literal text in `xsl:text`.
    pub fn set_text_as_element(&mut self, enabled: bool) {
        self.text_as_element = enabled;
    }

    /// The current insertion point.
    pub fn cursor(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    /// Number of elements on the stack, root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn tree(&self) -> &OutputTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut OutputTree {
        &mut self.tree
    }

    pub fn xsl_ns(&self) -> &Namespace {
        &self.xsl_ns
    }

    pub(crate) fn next_temp_count(&mut self) -> u32 {
        self.temp_count += 1;
        self.temp_count
    }

    fn cursor_element_mut(&mut self, what: &str) -> Result<&mut Element, BuildError> {
        let cursor = self.cursor();
        self.tree
            .element_mut(cursor)
            .ok_or_else(|| BuildError::NotAnElement {
                name: what.to_string(),
            })
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let cursor = self.cursor();
        let id = self.tree.create(kind);
        self.tree.append_child(cursor, id);
        id
    }

    fn xsl_element(&self, tag: &str) -> Element {
        Element::new(tag, Some(self.xsl_ns.clone()), self.line)
    }

    /// Resolve the prefix of `name` against the cursor's ancestors.
    ///
    /// An unknown prefix is dropped with a warning, as is done for elements
    /// and attributes alike.
    fn resolve(&self, name: &str) -> (Option<Namespace>, String) {
        let (prefix, local) = split_qname(name);
        let Some(prefix) = prefix else {
            return (None, local.to_string());
        };

        match self.tree.search_ns(self.cursor(), Some(prefix)) {
            Some(ns) => (Some(ns.clone()), local.to_string()),
            None => {
                tracing::warn!(line = self.line, prefix, name, "undeclared namespace prefix");
                (None, local.to_string())
            }
        }
    }

    /// Open a literal result element under the cursor and make it the cursor.
    ///
    /// Without a (resolvable) prefix the element lands in the nearest
    /// inherited default namespace, if any.
    pub fn open(&mut self, name: &str) -> Result<NodeId, BuildError> {
        check_name(name)?;
        let (ns, local) = self.resolve(name);
        let ns = ns.or_else(|| self.tree.search_ns(self.cursor(), None).cloned());

        let element = Element::new(local, ns, self.line);
        let id = self.append(NodeKind::Element(element));
        self.stack.push(id);
        Ok(id)
    }

    /// Leave the current literal element.
    pub fn close(&mut self) -> Result<(), BuildError> {
        self.pop()
    }

    /// Open an XSLT instruction element, optionally with one attribute.
    pub fn push_xsl(&mut self, tag: &str, attr: Option<(&str, &str)>) -> Result<NodeId, BuildError> {
        let id = self.add_element(tag, attr)?;
        self.stack.push(id);
        Ok(id)
    }

    /// Leave the current instruction element.
    pub fn pop(&mut self) -> Result<(), BuildError> {
        if self.stack.len() <= 1 {
            return Err(BuildError::CloseRoot);
        }
        self.stack.pop();
        Ok(())
    }

    /// Add an XSLT instruction element under the cursor without entering it.
    pub fn add_element(&mut self, tag: &str, attr: Option<(&str, &str)>) -> Result<NodeId, BuildError> {
        check_name(tag)?;
        let mut element = self.xsl_element(tag);
        if let Some((name, value)) = attr {
            check_name(name)?;
            element.set_attribute(name, value);
        }
        Ok(self.append(NodeKind::Element(element)))
    }

    /// Add an instruction element whose one attribute is rendered from
    /// `value` as a plain expression.
    pub fn add_element_with_text(
        &mut self,
        tag: &str,
        attr_name: &str,
        value: &TokenList,
    ) -> Result<NodeId, BuildError> {
        let text = render_text(value, false);
        self.add_element(tag, Some((attr_name, text.as_str())))
    }

    /// The text `add_attribute` stores for `value`.
    fn attribute_text(name: &str, value: &TokenList) -> String {
        if let Some(token) = value.as_single() {
            return render_text(&TokenList::single(token.clone()), true);
        }
        if name == xsl::ATT_PRIORITY {
            return render_compact(value, true);
        }
        render_value(value, true)
    }

    /// Set an attribute on the cursor whose value is an expression.
    ///
    /// A single token is stored as written. Several tokens become one
    /// expression, wrapped in `concat()` when `_` joins them. A `priority`
    /// value is stored without spaces so a sign stays on its number.
    pub fn add_attribute(&mut self, name: &str, value: &TokenList) -> Result<(), BuildError> {
        check_name(name)?;
        if value.is_empty() {
            return Err(BuildError::EmptyValue {
                name: name.to_string(),
            });
        }

        let text = Self::attribute_text(name, value);
        let (ns, local) = self.resolve(name);
        self.cursor_element_mut(name)?
            .set_ns_attribute(&local, ns, text);
        Ok(())
    }

    /// Set an attribute on a literal element from a mix of strings and
    /// expressions.
    ///
    /// Strings are copied with their braces doubled; variables, names and
    /// pre-rendered expressions become `{...}` placeholders. Any other token,
    /// a bare number included, builds an `xsl:attribute` child computing the
    /// value instead.
    pub fn add_attribute_value_template(
        &mut self,
        name: &str,
        value: &TokenList,
    ) -> Result<(), BuildError> {
        check_name(name)?;
        if value.is_empty() {
            return Err(BuildError::EmptyValue {
                name: name.to_string(),
            });
        }

        let mut text = String::new();
        for token in value {
            match token.kind {
                TokenKind::Quoted => text.push_str(&escape_braces(&literal_content(&token.text))),
                TokenKind::Variable | TokenKind::Bare | TokenKind::Expression => {
                    text.push('{');
                    text.push_str(&token.text);
                    text.push('}');
                }
                TokenKind::Underscore => {}
                _ => return self.add_computed_attribute(name, value),
            }
        }

        let (ns, local) = self.resolve(name);
        self.cursor_element_mut(name)?
            .set_ns_attribute(&local, ns, text);
        Ok(())
    }

    fn add_computed_attribute(&mut self, name: &str, value: &TokenList) -> Result<(), BuildError> {
        self.push_xsl(xsl::ELT_ATTRIBUTE, Some((xsl::ATT_NAME, name)))?;
        let added = self.add_text_or_value(value, false);
        self.pop()?;
        added.map(|_| ())
    }

    /// Set an attribute to the literal content of quoted tokens.
    pub fn add_attribute_string(&mut self, name: &str, value: &TokenList) -> Result<(), BuildError> {
        check_name(name)?;
        let text: String = value.iter().map(|token| literal_content(&token.text)).collect();
        self.cursor_element_mut(name)?.set_attribute(name, text);
        Ok(())
    }

    /// Append `value` to an attribute of the cursor, space separated.
    pub fn extend_attribute(&mut self, name: &str, value: &str) -> Result<(), BuildError> {
        check_name(name)?;
        let element = self.cursor_element_mut(name)?;
        let extended = match element.attribute(name) {
            Some(current) => format!("{} {}", current, value),
            None => value.to_string(),
        };
        element.set_attribute(name, extended);
        Ok(())
    }

    /// Add a value statement under the cursor.
    ///
    /// A lone string becomes literal text, wrapped in `xsl:text` when asked
    /// to or when the text is empty or has a leading or trailing space or
    /// tab (which serialization would otherwise lose). Anything else becomes
    /// `xsl:value-of`. Returns the node added to the cursor.
    pub fn add_text_or_value(
        &mut self,
        value: &TokenList,
        text_as_element: bool,
    ) -> Result<NodeId, BuildError> {
        let Some(first) = value.first() else {
            return Err(BuildError::EmptyValue {
                name: xsl::ELT_VALUE_OF.to_string(),
            });
        };

        if value.is_single_quoted() {
            let text = literal_content(&first.text);
            let padded = text.starts_with([' ', '\t']) || text.ends_with([' ', '\t']);
            let wrap = text_as_element || self.text_as_element || text.is_empty() || padded;

            if !wrap {
                return Ok(self.append(NodeKind::Text(text)));
            }
            let wrapper = self.xsl_element(xsl::ELT_TEXT);
            let wrapper = self.append(NodeKind::Element(wrapper));
            let node = self.tree.create(NodeKind::Text(text));
            self.tree.append_child(wrapper, node);
            return Ok(wrapper);
        }

        let select = match value.as_single() {
            Some(token) => token.text.clone(),
            None => render_value(value, false),
        };
        let mut element = self.xsl_element(xsl::ELT_VALUE_OF);
        element.set_attribute(xsl::ATT_SELECT, select);
        Ok(self.append(NodeKind::Element(element)))
    }

    /// Add an `xsl:comment` instruction: literal text for a lone string,
    /// a computed value otherwise.
    pub fn add_comment_statement(&mut self, value: &TokenList) -> Result<NodeId, BuildError> {
        if value.is_empty() {
            return Err(BuildError::EmptyValue {
                name: xsl::ELT_COMMENT.to_string(),
            });
        }
        let comment = self.add_element(xsl::ELT_COMMENT, None)?;

        let child = match value.as_single() {
            Some(token) if token.kind == TokenKind::Quoted => {
                NodeKind::Text(literal_content(&token.text))
            }
            _ => {
                let mut value_of = self.xsl_element(xsl::ELT_VALUE_OF);
                value_of.set_attribute(xsl::ATT_SELECT, Self::attribute_text(xsl::ATT_SELECT, value));
                NodeKind::Element(value_of)
            }
        };
        let child = self.tree.create(child);
        self.tree.append_child(comment, child);
        Ok(comment)
    }

    /// Add a literal comment node under the cursor.
    pub fn add_comment(&mut self, text: &str) -> NodeId {
        self.append(NodeKind::Comment(text.to_string()))
    }

    /// Declare a namespace on the cursor.
    ///
    /// When the cursor is itself in a namespace with the same prefix (or
    /// both are default namespaces), or it is in no namespace and this is a
    /// default declaration, the cursor moves into the new namespace.
    pub fn add_namespace(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), BuildError> {
        let ns = Namespace::new(prefix, uri);
        let element = self.cursor_element_mut("xmlns")?;

        if element.ns_defs.iter().any(|def| def.prefix == ns.prefix) {
            return Err(BuildError::DuplicateNamespace {
                prefix: ns.prefix,
            });
        }
        element.ns_defs.push(ns.clone());

        let adopt = match &element.ns {
            Some(current) => current.prefix == ns.prefix,
            None => ns.prefix.is_none(),
        };
        if adopt {
            element.ns = Some(ns);
        }
        Ok(())
    }

    /// Hand over the finished tree.
    ///
    /// # Panics
    ///
    /// If the grammar left elements open.
    pub fn finish(self) -> OutputTree {
        assert_eq!(
            self.stack.len(),
            1,
            "unbalanced element stack at end of parse"
        );
        self.tree
    }
}

impl CommentSink for TreeBuilder {
    fn add_comment(&mut self, text: &str) {
        TreeBuilder::add_comment(self, text);
    }
}
