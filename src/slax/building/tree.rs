//! Output tree
//!
//! An arena of element, text and comment nodes. Each node owns the ids of
//! its children in order and keeps a plain id back to its parent, which is
//! only ever used for ancestor walks (namespace lookup, re-parenting). Nodes
//! removed by a rewrite stay in the arena detached and are never reachable
//! from the root again.

use serde::Serialize;

/// Index of a node in its [`OutputTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A namespace binding. `prefix` is `None` for the default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub uri: String,
}

impl Namespace {
    pub fn new(prefix: Option<&str>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            uri: uri.into(),
        }
    }

    /// Name of the declaring attribute (`xmlns` or `xmlns:prefix`).
    pub fn declaration_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub ns: Option<Namespace>,
    pub value: String,
}

impl Attribute {
    pub fn qualified_name(&self) -> String {
        qualify(self.ns.as_ref(), &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Local name
    pub name: String,
    /// Namespace the element is in
    pub ns: Option<Namespace>,
    /// Namespaces declared on this element
    pub ns_defs: Vec<Namespace>,
    pub attributes: Vec<Attribute>,
    /// Source line the element was created on (0 when synthesized)
    pub line: usize,
}

impl Element {
    pub fn new(name: impl Into<String>, ns: Option<Namespace>, line: usize) -> Self {
        Self {
            name: name.into(),
            ns,
            ns_defs: Vec::new(),
            attributes: Vec::new(),
            line,
        }
    }

    /// `prefix:name`, or just the name when the namespace has no prefix.
    pub fn qualified_name(&self) -> String {
        qualify(self.ns.as_ref(), &self.name)
    }

    /// Value of the un-namespaced attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.ns.is_none() && attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an un-namespaced attribute, replacing any existing value in place.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.set_ns_attribute(name, None, value);
    }

    pub fn set_ns_attribute(&mut self, name: &str, ns: Option<Namespace>, value: impl Into<String>) {
        let value = value.into();
        let existing = self
            .attributes
            .iter_mut()
            .find(|attr| attr.name == name && attr.ns.as_ref().map(|n| &n.uri) == ns.as_ref().map(|n| &n.uri));
        match existing {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                ns,
                value,
            }),
        }
    }

    /// Is this element `local_name` in namespace `uri`?
    pub fn is(&self, uri: &str, local_name: &str) -> bool {
        self.name == local_name && self.ns.as_ref().is_some_and(|ns| ns.uri == uri)
    }
}

fn qualify(ns: Option<&Namespace>, name: &str) -> String {
    match ns.and_then(|ns| ns.prefix.as_deref()) {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl OutputTree {
    /// A tree holding only `root`.
    pub fn new(root: Element) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element(root),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Nodes allocated so far, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Element children of `id`, skipping text and comments.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        self.children(id)
            .iter()
            .filter_map(move |&child| self.element(child).map(|element| (child, element)))
    }

    /// Is `id` the root or hanging somewhere below it?
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|ancestor| ancestor == self.root)
    }

    /// `id` itself, then its parent, up to the top of its subtree.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Create a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Unlink `id` from its parent. The subtree below it is kept.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Find the binding for `prefix` declared on `id` or its nearest
    /// ancestor. `None` looks for a default namespace.
    pub fn search_ns(&self, id: NodeId, prefix: Option<&str>) -> Option<&Namespace> {
        self.ancestors(id)
            .filter_map(|ancestor| self.element(ancestor))
            .flat_map(|element| element.ns_defs.iter())
            .find(|ns| ns.prefix.as_deref() == prefix)
    }

    /// Depth-first walk of the attached tree, parents before children.
    pub fn descendants(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, 0)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}
