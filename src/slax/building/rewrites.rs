//! Structural rewrites applied after a construct is complete
//!
//! Both work by detaching, relabelling and re-attaching arena nodes; no node
//! is ever reachable from two parents.

use super::builder::TreeBuilder;
use super::error::BuildError;
use super::tree::{Element, Namespace, NodeId, NodeKind};
use super::xsl;

impl TreeBuilder {
    /// Collapse an `xsl:choose` holding a single `xsl:when` into an `xsl:if`.
    ///
    /// The `when` is renamed and moved under the cursor; the `choose` is
    /// dropped. Returns whether anything changed. Any other shape, including
    /// a node that has already been rewritten, is left alone.
    pub fn simplify_conditional(&mut self, choose: NodeId) -> bool {
        let tree = self.tree();
        let Some(element) = tree.element(choose) else {
            return false;
        };
        if element.name != xsl::ELT_CHOOSE || !tree.is_attached(choose) {
            return false;
        }

        let when = match tree.children(choose) {
            [only] => *only,
            _ => return false,
        };
        if tree.element(when).map(|e| e.name.as_str()) != Some(xsl::ELT_WHEN) {
            return false;
        }

        let cursor = self.cursor();
        let tree = self.tree_mut();
        tree.detach(when);
        if let Some(element) = tree.element_mut(when) {
            element.name = xsl::ELT_IF.to_string();
        }
        tree.detach(choose);
        tree.append_child(cursor, when);
        true
    }

    /// Keep a variable from holding a result tree fragment.
    ///
    /// A variable (or parameter) with content is renamed to
    /// `<name>-temp-<n>` and followed by a sibling of the original name that
    /// selects `ext:node-set($<name>-temp-<n>)`. The `ext` namespace is
    /// declared on the new sibling unless it is already in scope. Returns
    /// the new sibling, or `None` when the variable has no content.
    pub fn avoid_fragment_result(&mut self, var: NodeId) -> Result<Option<NodeId>, BuildError> {
        let tree = self.tree();
        let Some(element) = tree.element(var) else {
            return Err(BuildError::NotAnElement {
                name: xsl::ELT_VARIABLE.to_string(),
            });
        };
        if tree.children(var).is_empty() {
            return Ok(None);
        }
        let Some(parent) = tree.parent(var) else {
            return Err(BuildError::Detached {
                name: element.qualified_name(),
            });
        };

        let name = element.attribute(xsl::ATT_NAME).unwrap_or_default().to_string();
        let mut sibling = Element::new(element.name.clone(), element.ns.clone(), self.line());
        let ext_in_scope = tree.search_ns(parent, Some(xsl::EXT_PREFIX)).is_some();

        let temp = format!("{}-temp-{}", name, self.next_temp_count());
        sibling.set_attribute(xsl::ATT_NAME, name);
        sibling.set_attribute(xsl::ATT_SELECT, format!("ext:node-set(${})", temp));
        if !ext_in_scope {
            sibling
                .ns_defs
                .push(Namespace::new(Some(xsl::EXT_PREFIX), xsl::EXT_NS));
        }

        let tree = self.tree_mut();
        if let Some(element) = tree.element_mut(var) {
            element.set_attribute(xsl::ATT_NAME, temp);
        }
        let sibling = tree.create(NodeKind::Element(sibling));
        tree.append_child(parent, sibling);
        Ok(Some(sibling))
    }
}
