//! Fluent assertions over an [`OutputTree`].

use crate::slax::building::xsl::XSL_NS;
use crate::slax::building::{Element, NodeId, NodeKind, OutputTree};

/// Start asserting at the root of `tree`.
pub fn assert_tree(tree: &OutputTree) -> NodeAssertion<'_> {
    NodeAssertion {
        tree,
        id: tree.root(),
        context: "root".to_string(),
    }
}

pub struct NodeAssertion<'a> {
    tree: &'a OutputTree,
    id: NodeId,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    fn as_element(&self) -> &'a Element {
        match &self.tree.node(self.id).kind {
            NodeKind::Element(element) => element,
            other => panic!("{}: Expected an element, found {}", self.context, describe(other)),
        }
    }

    /// Assert this is an element with the qualified name `name`
    pub fn element(self, name: &str) -> Self {
        let element = self.as_element();
        assert_eq!(
            element.qualified_name(),
            name,
            "{}: Expected element '{}', found '{}'",
            self.context,
            name,
            element.qualified_name()
        );
        self
    }

    /// Assert this is the XSLT instruction `local_name`
    pub fn xsl(self, local_name: &str) -> Self {
        let element = self.as_element();
        assert!(
            element.is(XSL_NS, local_name),
            "{}: Expected xsl:{}, found '{}'",
            self.context,
            local_name,
            element.qualified_name()
        );
        self
    }

    /// Assert the element is in the namespace `uri`
    pub fn namespace(self, uri: &str) -> Self {
        let element = self.as_element();
        let actual = element.ns.as_ref().map(|ns| ns.uri.as_str());
        assert_eq!(
            actual,
            Some(uri),
            "{}: Expected namespace '{}' on '{}'",
            self.context,
            uri,
            element.qualified_name()
        );
        self
    }

    pub fn no_namespace(self) -> Self {
        let element = self.as_element();
        assert!(
            element.ns.is_none(),
            "{}: Expected '{}' to be in no namespace",
            self.context,
            element.qualified_name()
        );
        self
    }

    /// Assert the attribute with qualified name `name` has `value`
    pub fn attribute(self, name: &str, value: &str) -> Self {
        let element = self.as_element();
        let actual = element
            .attributes
            .iter()
            .find(|attr| attr.qualified_name() == name)
            .map(|attr| attr.value.as_str());
        assert_eq!(
            actual,
            Some(value),
            "{}: Attribute '{}' of '{}' (attributes: {})",
            self.context,
            name,
            element.qualified_name(),
            summarize_attributes(element)
        );
        self
    }

    pub fn no_attribute(self, name: &str) -> Self {
        let element = self.as_element();
        assert!(
            !element.attributes.iter().any(|attr| attr.qualified_name() == name),
            "{}: Expected no attribute '{}' on '{}'",
            self.context,
            name,
            element.qualified_name()
        );
        self
    }

    /// Assert the element declares `prefix` (or the default namespace) as `uri`
    pub fn declares(self, prefix: Option<&str>, uri: &str) -> Self {
        let element = self.as_element();
        let found = element
            .ns_defs
            .iter()
            .any(|ns| ns.prefix.as_deref() == prefix && ns.uri == uri);
        assert!(
            found,
            "{}: Expected '{}' to declare {}=\"{}\"",
            self.context,
            element.qualified_name(),
            prefix.map(|p| format!("xmlns:{}", p)).unwrap_or_else(|| "xmlns".into()),
            uri
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = self.tree.children(self.id);
        assert_eq!(
            children.len(),
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            children.len(),
            self.summarize_children()
        );
        self
    }

    /// Assert on child `index`
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = self.tree.children(self.id);
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds ({} children: [{}])",
            self.context,
            index,
            children.len(),
            self.summarize_children()
        );
        assertion(NodeAssertion {
            tree: self.tree,
            id: children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }

    /// Assert this is a text node holding exactly `expected`
    pub fn text(self, expected: &str) -> Self {
        match &self.tree.node(self.id).kind {
            NodeKind::Text(text) => assert_eq!(text, expected, "{}: text", self.context),
            other => panic!("{}: Expected text, found {}", self.context, describe(other)),
        }
        self
    }

    /// Assert this is a comment node holding exactly `expected`
    pub fn comment(self, expected: &str) -> Self {
        match &self.tree.node(self.id).kind {
            NodeKind::Comment(text) => assert_eq!(text, expected, "{}: comment", self.context),
            other => panic!("{}: Expected comment, found {}", self.context, describe(other)),
        }
        self
    }

    fn summarize_children(&self) -> String {
        self.tree
            .children(self.id)
            .iter()
            .map(|child| describe(&self.tree.node(*child).kind))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn describe(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Element(element) => format!("<{}>", element.qualified_name()),
        NodeKind::Text(text) => format!("text {:?}", text),
        NodeKind::Comment(text) => format!("comment {:?}", text),
    }
}

fn summarize_attributes(element: &Element) -> String {
    element
        .attributes
        .iter()
        .map(|attr| format!("{}=\"{}\"", attr.qualified_name(), attr.value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slax::building::TreeBuilder;

    #[test]
    fn test_root_assertions() {
        let mut builder = TreeBuilder::new();
        builder.add_comment("c");
        let tree = builder.finish();

        assert_tree(&tree)
            .xsl("stylesheet")
            .element("xsl:stylesheet")
            .attribute("version", "1.0")
            .declares(Some("xsl"), XSL_NS)
            .child_count(1)
            .child(0, |node| {
                node.comment("c");
            });
    }

    #[test]
    #[should_panic(expected = "Expected 2 children")]
    fn test_child_count_mismatch_panics() {
        let tree = TreeBuilder::new().finish();
        assert_tree(&tree).child_count(2);
    }
}
