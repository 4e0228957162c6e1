//! Indented XML markup for the output tree.
//!
//! An element whose children are all elements or comments is written with
//! one child per line, indented one unit deeper. An element holding any
//! text is written on a single line so no whitespace is added to its
//! content.

use super::registry::{FormatError, Formatter};
use crate::slax::building::{Element, NodeId, NodeKind, OutputTree};

pub const DEFAULT_INDENT: &str = "  ";

const DECLARATION: &str = "<?xml version=\"1.0\"?>";

pub fn to_xml_str(tree: &OutputTree) -> String {
    to_xml_str_with_indent(tree, DEFAULT_INDENT)
}

pub fn to_xml_str_with_indent(tree: &OutputTree, indent: &str) -> String {
    let mut writer = XmlWriter {
        tree,
        indent,
        out: String::new(),
    };
    writer.out.push_str(DECLARATION);
    writer.out.push('\n');
    writer.block(tree.root(), 0);
    writer.out
}

struct XmlWriter<'t> {
    tree: &'t OutputTree,
    indent: &'t str,
    out: String,
}

impl XmlWriter<'_> {
    /// Write `id` on its own line(s) at `depth`.
    fn block(&mut self, id: NodeId, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(self.indent);
        }

        let tree = self.tree;
        let node = tree.node(id);
        let NodeKind::Element(element) = &node.kind else {
            self.inline(id);
            self.out.push('\n');
            return;
        };

        let children = node.children();
        let has_text = children
            .iter()
            .any(|child| matches!(tree.node(*child).kind, NodeKind::Text(_)));
        if children.is_empty() || has_text {
            self.inline(id);
            self.out.push('\n');
            return;
        }

        self.start_tag(element);
        self.out.push('\n');
        for child in children {
            self.block(*child, depth + 1);
        }
        for _ in 0..depth {
            self.out.push_str(self.indent);
        }
        self.end_tag(element);
        self.out.push('\n');
    }

    /// Write `id` and everything under it without any added whitespace.
    fn inline(&mut self, id: NodeId) {
        let tree = self.tree;
        let node = tree.node(id);
        match &node.kind {
            NodeKind::Text(text) => self.out.push_str(&escape(text, false)),
            NodeKind::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(&comment_body(text));
                self.out.push_str("-->");
            }
            NodeKind::Element(element) if node.children().is_empty() => {
                self.open(element);
                self.out.push_str("/>");
            }
            NodeKind::Element(element) => {
                self.start_tag(element);
                for child in node.children() {
                    self.inline(*child);
                }
                self.end_tag(element);
            }
        }
    }

    fn open(&mut self, element: &Element) {
        self.out.push('<');
        self.out.push_str(&element.qualified_name());
        for ns in &element.ns_defs {
            self.attribute(&ns.declaration_name(), &ns.uri);
        }
        for attribute in &element.attributes {
            self.attribute(&attribute.qualified_name(), &attribute.value);
        }
    }

    fn attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape(value, true));
        self.out.push('"');
    }

    fn start_tag(&mut self, element: &Element) {
        self.open(element);
        self.out.push('>');
    }

    fn end_tag(&mut self, element: &Element) {
        self.out.push_str("</");
        self.out.push_str(&element.qualified_name());
        self.out.push('>');
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A comment may not contain `--` or end in `-`.
fn comment_body(text: &str) -> String {
    let mut body = text.to_string();
    while body.contains("--") {
        body = body.replace("--", "- -");
    }
    if body.ends_with('-') {
        body.push(' ');
    }
    body
}

pub struct XmlFormatter {
    indent: String,
}

impl XmlFormatter {
    pub fn new(indent: &str) -> Self {
        Self {
            indent: indent.to_string(),
        }
    }
}

impl Default for XmlFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl Formatter for XmlFormatter {
    fn name(&self) -> &str {
        "xml"
    }

    fn serialize(&self, tree: &OutputTree) -> Result<String, FormatError> {
        Ok(to_xml_str_with_indent(tree, &self.indent))
    }

    fn description(&self) -> &str {
        "Indented XSLT stylesheet markup"
    }
}
