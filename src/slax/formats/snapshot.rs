//! A normalized, serializable copy of the output tree.
//!
//! The arena stores nodes by index with parent links; the snapshot is a
//! plain nested value that serializers can walk or hand straight to serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::slax::building::{NodeId, NodeKind, OutputTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// `Element`, `Text` or `Comment`
    pub node_type: String,
    /// Qualified name of an element, content of text and comments
    pub label: String,
    /// Attributes and namespace declarations of an element
    pub attributes: BTreeMap<String, String>,
    /// Source line of an element, 0 when synthesized
    pub line: usize,
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            line: 0,
            children: Vec::new(),
        }
    }
}

/// Snapshot of the whole tree, starting at its root.
pub fn snapshot_from_tree(tree: &OutputTree) -> TreeSnapshot {
    snapshot_node(tree, tree.root())
}

pub fn snapshot_node(tree: &OutputTree, id: NodeId) -> TreeSnapshot {
    let mut snapshot = match &tree.node(id).kind {
        NodeKind::Element(element) => {
            let mut snapshot = TreeSnapshot::new("Element", element.qualified_name());
            for ns in &element.ns_defs {
                snapshot
                    .attributes
                    .insert(ns.declaration_name(), ns.uri.clone());
            }
            for attribute in &element.attributes {
                snapshot
                    .attributes
                    .insert(attribute.qualified_name(), attribute.value.clone());
            }
            snapshot.line = element.line;
            snapshot
        }
        NodeKind::Text(text) => TreeSnapshot::new("Text", text.as_str()),
        NodeKind::Comment(text) => TreeSnapshot::new("Comment", text.as_str()),
    };

    snapshot.children = tree
        .children(id)
        .iter()
        .map(|child| snapshot_node(tree, *child))
        .collect();
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slax::building::TreeBuilder;

    #[test]
    fn test_snapshot_root() {
        let mut builder = TreeBuilder::new();
        builder.add_comment(" note ");
        let tree = builder.finish();

        let snapshot = snapshot_from_tree(&tree);
        assert_eq!(snapshot.node_type, "Element");
        assert_eq!(snapshot.label, "xsl:stylesheet");
        assert_eq!(snapshot.attributes.get("version").map(String::as_str), Some("1.0"));
        assert_eq!(
            snapshot.attributes.get("xmlns:xsl").map(String::as_str),
            Some("http://www.w3.org/1999/XSL/Transform")
        );
        assert_eq!(snapshot.children.len(), 1);
        assert_eq!(snapshot.children[0].node_type, "Comment");
        assert_eq!(snapshot.children[0].label, " note ");
    }
}
