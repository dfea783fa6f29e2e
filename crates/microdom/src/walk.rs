//! Pre-order depth-first walking
//!
//! `PreOrder` is the one traversal every query builds on: visit a node,
//! then its children in child-list order, then the next sibling. It is
//! lazy and `Clone`, so a walk can be restarted from a saved copy.
//!
//! Matcher-driven collectors (`find_nodes` and friends) live here too;
//! they only consider the descendants of `parent`, never `parent` itself.

use crate::arena::DomArena;
use crate::types::{DomNode, NodeId};

/// Lazy pre-order iterator over one or more subtrees
///
/// Children of the node last returned are expanded on the following call
/// to `next`, which lets a caller prune that subtree with
/// [`PreOrder::skip_children`].
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    arena: &'a DomArena,
    stack: Vec<NodeId>,
    last: Option<NodeId>,
}

impl<'a> PreOrder<'a> {
    pub fn new(arena: &'a DomArena, starts: &[NodeId]) -> Self {
        Self {
            arena,
            stack: starts.iter().rev().copied().collect(),
            last: None,
        }
    }

    /// Do not descend into the node most recently returned
    pub fn skip_children(&mut self) {
        self.last = None;
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(last) = self.last.take() {
            if let Some(node) = self.arena.node(last) {
                self.stack.extend(node.children_ids.iter().rev().copied());
            }
        }

        // Unknown IDs are skipped rather than ending the walk
        while let Some(node_id) = self.stack.pop() {
            if let Some(node) = self.arena.node(node_id) {
                self.last = Some(node_id);
                return Some(node);
            }
        }

        None
    }
}

/// Every descendant of `parent` accepted by `matcher`, in pre-order
pub fn find_nodes<F>(arena: &DomArena, parent: NodeId, mut matcher: F) -> Vec<NodeId>
where
    F: FnMut(&DomNode) -> bool,
{
    arena
        .walk_siblings(arena.child_ids(parent))
        .filter(|node| matcher(*node))
        .map(|node| node.node_id)
        .collect()
}

/// Like [`find_nodes`], but a matched node's subtree is not searched
pub fn find_nodes_shallow<F>(arena: &DomArena, parent: NodeId, mut matcher: F) -> Vec<NodeId>
where
    F: FnMut(&DomNode) -> bool,
{
    let mut found = Vec::new();
    let mut walk = arena.walk_siblings(arena.child_ids(parent));
    while let Some(node) = walk.next() {
        if matcher(node) {
            found.push(node.node_id);
            walk.skip_children();
        }
    }
    found
}

/// Collect matches, descending only into nodes accepted by `recurse`
///
/// Matching and recursion are independent: a node can be collected and
/// still be searched, or skipped and still be searched.
pub fn find_nodes_shallow_on_match<F, R>(
    arena: &DomArena,
    parent: NodeId,
    mut matcher: F,
    mut recurse: R,
) -> Vec<NodeId>
where
    F: FnMut(&DomNode) -> bool,
    R: FnMut(&DomNode) -> bool,
{
    let mut found = Vec::new();
    let mut walk = arena.walk_siblings(arena.child_ids(parent));
    while let Some(node) = walk.next() {
        if matcher(node) {
            found.push(node.node_id);
        }
        if !recurse(node) {
            walk.skip_children();
        }
    }
    found
}

/// [`find_nodes`] restricted to elements
pub fn find_elements<F>(arena: &DomArena, parent: NodeId, mut matcher: F) -> Vec<NodeId>
where
    F: FnMut(&DomNode) -> bool,
{
    find_nodes(arena, parent, |node| node.is_element() && matcher(node))
}
