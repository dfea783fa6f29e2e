//! Arena-based DOM tree storage
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! Every node lives in one `Vec<DomNode>`. Parent and child links are
//! `NodeId` indices, so there is no shared ownership and no reference
//! cycles. The child list is the only ownership edge; `parent_id` is a
//! lookup link.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Document][Node1][Node2]...
//!         ↑ always index 0
//! ```
//!
//! Detached nodes stay in the arena but are unreachable from the
//! document; they are freed when the arena is dropped.

use crate::error::{DomError, Result};
use crate::types::{DomNode, ElementData, NodeData, NodeId};
use crate::walk::PreOrder;

/// Index of the Document node in every arena
pub const DOCUMENT_ID: NodeId = 0;

/// Arena holding one document tree
#[derive(Debug, Clone)]
pub struct DomArena {
    /// All nodes stored sequentially, `nodes[0]` is the Document
    nodes: Vec<DomNode>,
}

impl DomArena {
    /// Create an arena holding only the Document node
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(DomNode::new(DOCUMENT_ID, NodeData::Document));
        Self { nodes }
    }

    fn add_node(&mut self, data: NodeData) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(DomNode::new(node_id, data));
        node_id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: impl Into<String>) -> NodeId {
        self.add_node(NodeData::Element(ElementData::new(tag_name)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.add_node(NodeData::Text(data.into()))
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID, `None` for unknown IDs
    pub fn node(&self, node_id: NodeId) -> Option<&DomNode> {
        self.nodes.get(node_id as usize)
    }

    /// The Document node ID
    pub fn root_id(&self) -> NodeId {
        DOCUMENT_ID
    }

    /// The Document node
    pub fn root(&self) -> &DomNode {
        &self.nodes[DOCUMENT_ID as usize]
    }

    /// First element child of the Document
    pub fn document_element(&self) -> Option<NodeId> {
        self.root()
            .children_ids
            .iter()
            .copied()
            .find(|&id| self.node(id).is_some_and(DomNode::is_element))
    }

    /// Total number of nodes, detached ones and the Document included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena holds nothing but the Document
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Child IDs of a node in document order (empty for unknown IDs)
    pub fn child_ids(&self, node_id: NodeId) -> &[NodeId] {
        self.node(node_id)
            .map(|node| node.children_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Append `child` as the last child of `parent`
    ///
    /// The child must be detached, must not be the Document, and must not
    /// be an ancestor of `parent`. Text nodes cannot have children.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        let parent = self.get(parent_id)?;
        if parent.is_text() {
            return Err(DomError::InvalidNodeType {
                expected: "element or document".to_string(),
                actual: parent.node_type().as_str().to_string(),
            });
        }

        let child = self.get(child_id)?;
        let has_children = child.has_children();
        if child.is_document() {
            return Err(DomError::Hierarchy(
                "document node cannot be a child".to_string(),
            ));
        }
        if let Some(owner) = child.parent_id {
            return Err(DomError::Hierarchy(format!(
                "node {} already has parent {}",
                child_id, owner
            )));
        }

        // A detached leaf can only be its own ancestor
        let mut cursor = if has_children || parent_id == child_id {
            Some(parent_id)
        } else {
            None
        };
        while let Some(id) = cursor {
            if id == child_id {
                return Err(DomError::Hierarchy(format!(
                    "appending {} under {} would create a cycle",
                    child_id, parent_id
                )));
            }
            cursor = self.get(id)?.parent_id;
        }

        self.get_mut(child_id)?.parent_id = Some(parent_id);
        self.get_mut(parent_id)?.children_ids.push(child_id);
        Ok(())
    }

    /// Remove a node from its parent's child list
    ///
    /// No-op for nodes that are already detached.
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let Some(parent_id) = self.get(node_id)?.parent_id else {
            return Ok(());
        };
        self.get_mut(parent_id)?
            .children_ids
            .retain(|id| *id != node_id);
        self.get_mut(node_id)?.parent_id = None;
        Ok(())
    }

    /// Detach every child of a node, returns how many were removed
    pub fn clear_children(&mut self, node_id: NodeId) -> Result<usize> {
        let children = std::mem::take(&mut self.get_mut(node_id)?.children_ids);
        for &child_id in &children {
            self.get_mut(child_id)?.parent_id = None;
        }
        Ok(children.len())
    }

    /// Set an attribute on an element, returns the previous value
    pub fn set_attribute(
        &mut self,
        node_id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        let element = self.element_mut(node_id)?;
        Ok(element.attributes.insert(name.into(), value.into()))
    }

    /// Remove an attribute from an element, returns the removed value
    pub fn remove_attribute(&mut self, node_id: NodeId, name: &str) -> Result<Option<String>> {
        let element = self.element_mut(node_id)?;
        Ok(element.attributes.remove(name))
    }

    /// Replace the character data of a text node
    pub fn set_text(&mut self, node_id: NodeId, data: impl Into<String>) -> Result<()> {
        let node = self.get_mut(node_id)?;
        let actual = node.node_type().as_str();
        match &mut node.data {
            NodeData::Text(text) => {
                *text = data.into();
                Ok(())
            }
            _ => Err(DomError::InvalidNodeType {
                expected: "text".to_string(),
                actual: actual.to_string(),
            }),
        }
    }

    fn element_mut(&mut self, node_id: NodeId) -> Result<&mut ElementData> {
        let node = self.get_mut(node_id)?;
        let actual = node.node_type().as_str();
        node.element_mut().ok_or_else(|| DomError::InvalidNodeType {
            expected: "element".to_string(),
            actual: actual.to_string(),
        })
    }

    /// Create an element with attributes and append it under `parent`
    pub fn element(
        &mut self,
        parent_id: NodeId,
        tag_name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId> {
        let node_id = self.create_element(tag_name);
        for &(name, value) in attributes {
            self.set_attribute(node_id, name, value)?;
        }
        self.append_child(parent_id, node_id)?;
        Ok(node_id)
    }

    /// Create a text node and append it under `parent`
    pub fn text(&mut self, parent_id: NodeId, data: &str) -> Result<NodeId> {
        let node_id = self.create_text(data);
        self.append_child(parent_id, node_id)?;
        Ok(node_id)
    }

    /// Lazy pre-order walk of the subtree at `start`, `start` included
    pub fn descendants(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder::new(self, &[start])
    }

    /// Lazy pre-order walk over a sibling sequence and all their descendants
    pub fn walk_siblings(&self, siblings: &[NodeId]) -> PreOrder<'_> {
        PreOrder::new(self, siblings)
    }

    /// Traverse tree depth-first (iterative, no recursion)
    ///
    /// Stops at the first error returned by `visit`.
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Structural equality of two subtrees, possibly in different arenas
    ///
    /// Compares kind, tag name, attributes, text and children in order.
    /// Node IDs and parent links are ignored.
    pub fn is_equal_node(&self, node_id: NodeId, other: &DomArena, other_id: NodeId) -> bool {
        let mut stack = vec![(node_id, other_id)];

        while let Some((left_id, right_id)) = stack.pop() {
            let (Some(a), Some(b)) = (self.node(left_id), other.node(right_id)) else {
                return false;
            };
            if a.data != b.data || a.children_ids.len() != b.children_ids.len() {
                return false;
            }
            stack.extend(
                a.children_ids
                    .iter()
                    .copied()
                    .zip(b.children_ids.iter().copied()),
            );
        }

        true
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}
