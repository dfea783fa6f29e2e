//! Structural queries and subtree mutations
//!
//! Every function here re-walks the tree; nothing is indexed or cached.
//! Unknown node IDs produce empty results, never errors.
//!
//! Two reach conventions are used:
//! - tag, text and name walks start *at* `root` (the root itself can match)
//! - attribute collectors only look at descendants of the given parent

use crate::arena::DomArena;
use crate::types::{DomNode, NodeId};
use crate::utils;
use crate::walk;
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Text gathering options
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Inserted between consecutive text fragments
    pub join_with: String,
    /// Decode entity and character references in each fragment
    pub unescape: bool,
}

/// All elements named `name` in the subtree at `root`, in document order
///
/// Case-sensitive. Matching an element does not stop the walk from
/// descending into it.
pub fn get_elements_by_tag_name(arena: &DomArena, root: NodeId, name: &str) -> Vec<NodeId> {
    arena
        .descendants(root)
        .filter(|node| node.tag_name() == Some(name))
        .map(|node| node.node_id)
        .collect()
}

/// [`get_elements_by_tag_name`] with ASCII case-insensitive matching
pub fn get_elements_by_tag_name_no_case(
    arena: &DomArena,
    root: NodeId,
    name: &str,
) -> Vec<NodeId> {
    arena
        .descendants(root)
        .filter(|node| {
            node.tag_name()
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
        })
        .map(|node| node.node_id)
        .collect()
}

/// Concatenate every text node under `root` in document order
pub fn gather_text_nodes(arena: &DomArena, root: NodeId) -> String {
    gather_text_nodes_with(arena, root, &TextOptions::default())
}

pub fn gather_text_nodes_with(arena: &DomArena, root: NodeId, options: &TextOptions) -> String {
    let mut text = String::new();
    let mut first = true;

    for fragment in arena.descendants(root).filter_map(DomNode::text) {
        if !first {
            text.push_str(&options.join_with);
        }
        first = false;

        if options.unescape {
            text.push_str(&utils::unescape(fragment));
        } else {
            text.push_str(fragment);
        }
    }

    text
}

/// Unescaped text content of a subtree
pub fn get_node_text(arena: &DomArena, root: NodeId) -> String {
    gather_text_nodes_with(
        arena,
        root,
        &TextOptions {
            join_with: String::new(),
            unescape: true,
        },
    )
}

/// Remove every child of `node`, leaving its name and attributes alone
///
/// Leaves and unknown IDs are a no-op. Detached children lose their
/// parent link.
pub fn clear_node(arena: &mut DomArena, node: NodeId) {
    match arena.clear_children(node) {
        Ok(removed) => tracing::debug!(node, removed, "cleared node"),
        Err(err) => tracing::debug!(node, %err, "clear_node on unknown node"),
    }
}

/// Elements in `nodes` (and below) whose `attribute` equals `value`
///
/// With `no_nesting`, the subtree of a match is not searched any further;
/// its later siblings still are.
pub fn locate_nodes(
    arena: &DomArena,
    nodes: &[NodeId],
    attribute: &str,
    value: &str,
    no_nesting: bool,
) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut walk = arena.walk_siblings(nodes);

    while let Some(node) = walk.next() {
        if node.attr(attribute) == Some(value) {
            found.push(node.node_id);
            if no_nesting {
                walk.skip_children();
            }
        }
    }

    found
}

/// `node`, its parent, and so on up to the root, nearest first
pub fn get_parents(arena: &DomArena, node: NodeId) -> Vec<NodeId> {
    std::iter::successors(arena.node(node), |current| {
        current.parent_id.and_then(|parent| arena.node(parent))
    })
    .map(|node| node.node_id)
    .collect()
}

/// Descendant elements carrying `attribute`, optionally with an exact value
pub fn find_elements_with_attribute(
    arena: &DomArena,
    root: NodeId,
    attribute: &str,
    value: Option<&str>,
) -> Vec<NodeId> {
    walk::find_elements(arena, root, |node| attribute_matches(node, attribute, value))
}

/// Like [`find_elements_with_attribute`], without searching inside matches
pub fn find_elements_with_attribute_shallow(
    arena: &DomArena,
    root: NodeId,
    attribute: &str,
) -> Vec<NodeId> {
    walk::find_nodes_shallow(arena, root, |node| node.has_attr(attribute))
}

fn attribute_matches(node: &DomNode, attribute: &str, value: Option<&str>) -> bool {
    match (node.attr(attribute), value) {
        (Some(actual), Some(expected)) => actual == expected,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Elements named `name`, same reach and order as [`get_elements_by_tag_name`]
pub fn find_nodes_named(arena: &DomArena, root: NodeId, name: &str) -> Vec<NodeId> {
    get_elements_by_tag_name(arena, root, name)
}

/// Direct element children of `parent` named `name`
pub fn named_children(arena: &DomArena, parent: NodeId, name: &str) -> Vec<NodeId> {
    arena
        .child_ids(parent)
        .iter()
        .copied()
        .filter(|&id| arena.node(id).and_then(DomNode::tag_name) == Some(name))
        .collect()
}

/// Set `key` on `node` and every element below it
pub fn super_set_attribute(arena: &mut DomArena, node: NodeId, key: &str, value: &str) {
    update_subtree_attribute(arena, node, key, |_| value.to_string());
}

/// Prefix `key` with `value/` on `node` and every element below it
///
/// Elements without a non-empty `key` get plain `value`.
pub fn super_prepend_attribute(arena: &mut DomArena, node: NodeId, key: &str, value: &str) {
    update_subtree_attribute(arena, node, key, |old| match old {
        Some(old) if !old.is_empty() => format!("{}/{}", value, old),
        _ => value.to_string(),
    });
}

/// Suffix `key` with `/value` on `node` and every element below it
///
/// Elements without a non-empty `key` get plain `value`.
pub fn super_append_attribute(arena: &mut DomArena, node: NodeId, key: &str, value: &str) {
    update_subtree_attribute(arena, node, key, |old| match old {
        Some(old) if !old.is_empty() => format!("{}/{}", old, value),
        _ => value.to_string(),
    });
}

/// Fill `%(key)s` placeholders in every text node under `node`
///
/// `%%` becomes `%`. Placeholders whose key is missing from `subs` are
/// left as written.
pub fn substitute<S: BuildHasher>(
    arena: &mut DomArena,
    node: NodeId,
    subs: &HashMap<String, String, S>,
) {
    let targets: Vec<(NodeId, String)> = arena
        .descendants(node)
        .filter_map(|node| {
            let text = node.text()?;
            match utils::substitute_placeholders(text, |key| subs.get(key).map(String::as_str)) {
                Cow::Owned(filled) => Some((node.node_id, filled)),
                Cow::Borrowed(_) => None,
            }
        })
        .collect();

    for (id, text) in targets {
        if let Err(err) = arena.set_text(id, text) {
            tracing::warn!(node = id, %err, "failed to substitute text");
        }
    }
}

fn update_subtree_attribute<F>(arena: &mut DomArena, node: NodeId, key: &str, mut update: F)
where
    F: FnMut(Option<&str>) -> String,
{
    // Collect first, the walk borrows the arena
    let targets: Vec<(NodeId, String)> = arena
        .descendants(node)
        .filter(|node| node.is_element())
        .map(|node| (node.node_id, update(node.attr(key))))
        .collect();

    for (id, value) in targets {
        if let Err(err) = arena.set_attribute(id, key, value) {
            tracing::warn!(node = id, %err, "failed to update attribute");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::DOCUMENT_ID;

    fn attrs(arena: &DomArena, ids: &[NodeId], name: &str) -> String {
        ids.iter()
            .filter_map(|&id| arena.node(id)?.attr(name))
            .collect()
    }

    fn tags(arena: &DomArena, ids: &[NodeId]) -> String {
        ids.iter()
            .filter_map(|&id| arena.node(id)?.tag_name())
            .collect()
    }

    #[test]
    fn test_tag_name_includes_root_and_nested() {
        let mut arena = DomArena::new();
        let outer = arena.element(DOCUMENT_ID, "foo", &[("in", "1")]).unwrap();
        let inner = arena.element(outer, "foo", &[("in", "2")]).unwrap();
        arena.element(inner, "bar", &[]).unwrap();

        let found = get_elements_by_tag_name(&arena, outer, "foo");
        assert_eq!(attrs(&arena, &found, "in"), "12");
        assert!(get_elements_by_tag_name(&arena, outer, "FOO").is_empty());
        assert_eq!(get_elements_by_tag_name_no_case(&arena, outer, "FOO").len(), 2);
        assert!(get_elements_by_tag_name(&arena, outer, "baz").is_empty());
    }

    #[test]
    fn test_gather_text_with_options() {
        let mut arena = DomArena::new();
        let a = arena.element(DOCUMENT_ID, "a", &[]).unwrap();
        arena.text(a, "x &lt; y").unwrap();
        let b = arena.element(a, "b", &[]).unwrap();
        arena.text(b, "z").unwrap();

        assert_eq!(gather_text_nodes(&arena, DOCUMENT_ID), "x &lt; yz");
        assert_eq!(get_node_text(&arena, a), "x < yz");

        let joined = TextOptions {
            join_with: "|".to_string(),
            unescape: false,
        };
        assert_eq!(gather_text_nodes_with(&arena, a, &joined), "x &lt; y|z");
        assert_eq!(gather_text_nodes(&arena, b), "z");
    }

    #[test]
    fn test_clear_node_keeps_attributes() {
        let mut arena = DomArena::new();
        let a = arena.element(DOCUMENT_ID, "a", &[("id", "keep")]).unwrap();
        let b = arena.element(a, "b", &[]).unwrap();
        arena.text(b, "gone").unwrap();

        clear_node(&mut arena, a);
        clear_node(&mut arena, a);
        clear_node(&mut arena, 4242);

        let node = arena.get(a).unwrap();
        assert!(!node.has_children());
        assert_eq!(node.attr("id"), Some("keep"));
        assert_eq!(node.tag_name(), Some("a"));
        assert_eq!(arena.get(b).unwrap().parent_id, None);
        assert_eq!(gather_text_nodes(&arena, DOCUMENT_ID), "");
    }

    #[test]
    fn test_locate_nodes_stale_ids() {
        let arena = DomArena::new();
        assert!(locate_nodes(&arena, &[7, 8], "foo", "bar", true).is_empty());
    }

    #[test]
    fn test_get_parents_of_root() {
        let arena = DomArena::new();
        assert_eq!(get_parents(&arena, DOCUMENT_ID), vec![DOCUMENT_ID]);
        assert!(get_parents(&arena, 99).is_empty());
    }

    #[test]
    fn test_empty_value_is_literal() {
        let mut arena = DomArena::new();
        let a = arena.element(DOCUMENT_ID, "a", &[("foo", "")]).unwrap();
        arena.element(a, "b", &[]).unwrap();
        arena.element(a, "c", &[("foo", "1")]).unwrap();

        let empty = find_elements_with_attribute(&arena, DOCUMENT_ID, "foo", Some(""));
        assert_eq!(tags(&arena, &empty), "a");
        let any = find_elements_with_attribute(&arena, DOCUMENT_ID, "foo", None);
        assert_eq!(tags(&arena, &any), "ac");
    }

    #[test]
    fn test_find_elements_with_attribute_shallow() {
        let mut arena = DomArena::new();
        let a = arena.element(DOCUMENT_ID, "a", &[("foo", "1")]).unwrap();
        arena.element(a, "b", &[("foo", "2")]).unwrap();
        arena.element(DOCUMENT_ID, "c", &[("foo", "3")]).unwrap();

        let found = find_elements_with_attribute_shallow(&arena, DOCUMENT_ID, "foo");
        assert_eq!(tags(&arena, &found), "ac");
    }

    #[test]
    fn test_named_children_is_one_level() {
        let mut arena = DomArena::new();
        let doc = arena.element(DOCUMENT_ID, "doc", &[]).unwrap();
        let foo = arena.element(doc, "foo", &[]).unwrap();
        arena.element(foo, "foo", &[]).unwrap();
        arena.text(doc, "foo").unwrap();
        let foo2 = arena.element(doc, "foo", &[]).unwrap();

        assert_eq!(named_children(&arena, doc, "foo"), vec![foo, foo2]);
        assert_eq!(find_nodes_named(&arena, doc, "foo").len(), 3);
    }

    #[test]
    fn test_find_nodes_named_includes_element_root() {
        let mut arena = DomArena::new();
        let outer = arena.element(DOCUMENT_ID, "foo", &[]).unwrap();
        let inner = arena.element(outer, "foo", &[]).unwrap();

        let named = find_nodes_named(&arena, outer, "foo");
        assert_eq!(named, vec![outer, inner]);
        assert_eq!(named, get_elements_by_tag_name(&arena, outer, "foo"));
    }

    #[test]
    fn test_substitute_fills_text_nodes() {
        let mut arena = DomArena::new();
        let a = arena
            .element(DOCUMENT_ID, "a", &[("title", "%(name)s")])
            .unwrap();
        let greet = arena.text(a, "Hello %(name)s, 100%% %(missing)s").unwrap();
        let b = arena.element(a, "b", &[]).unwrap();
        let count = arena.text(b, "%(n)s items").unwrap();
        let plain = arena.text(b, "no placeholders").unwrap();

        let subs: HashMap<String, String> = [("name", "Ada"), ("n", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        substitute(&mut arena, a, &subs);

        assert_eq!(
            arena.get(greet).unwrap().text(),
            Some("Hello Ada, 100% %(missing)s")
        );
        assert_eq!(arena.get(count).unwrap().text(), Some("3 items"));
        assert_eq!(arena.get(plain).unwrap().text(), Some("no placeholders"));
        // attributes are not text nodes
        assert_eq!(arena.get(a).unwrap().attr("title"), Some("%(name)s"));
    }

    #[test]
    fn test_super_attributes() {
        let mut arena = DomArena::new();
        let a = arena.element(DOCUMENT_ID, "a", &[("m", "x")]).unwrap();
        let b = arena.element(a, "b", &[("m", "")]).unwrap();
        arena.text(b, "t").unwrap();
        let c = arena.element(b, "c", &[]).unwrap();

        super_prepend_attribute(&mut arena, a, "m", "p");
        assert_eq!(attrs(&arena, &[a, b, c], "m"), "p/xpp");

        super_append_attribute(&mut arena, b, "m", "s");
        assert_eq!(arena.get(b).unwrap().attr("m"), Some("p/s"));
        assert_eq!(arena.get(c).unwrap().attr("m"), Some("p/s"));
        assert_eq!(arena.get(a).unwrap().attr("m"), Some("p/x"));

        super_set_attribute(&mut arena, a, "m", "z");
        assert_eq!(attrs(&arena, &[a, b, c], "m"), "zzz");
    }
}
