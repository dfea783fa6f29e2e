//! Element lookup by id, falling back to class
//!
//! The search runs one full pre-order pass per lookup attribute: every
//! element is checked for `id` before any element is checked for `class`.
//! An element with a matching `class` that comes earlier in the document
//! than an element with a matching `id` therefore loses.
//!
//! `get`, `get_if_exists` and `get_and_clear` share `find_by_keys`, so
//! their matching is identical; they differ only in how a miss is reported.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::query;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Configuration for element lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Attributes consulted in priority order, one full pass each
    pub keys: Vec<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            keys: vec!["id".to_string(), "class".to_string()],
        }
    }
}

fn find_by_keys(arena: &DomArena, root: NodeId, key: &str, config: &LookupConfig) -> Option<NodeId> {
    config.keys.iter().find_map(|attribute| {
        arena
            .descendants(root)
            .find(|node| node.attr(attribute) == Some(key))
            .map(|node| node.node_id)
    })
}

/// Element whose id (or, failing that, class) equals `key`
///
/// Fails with [`DomError::NodeLookup`] carrying `key` when nothing matches.
pub fn get(arena: &DomArena, root: NodeId, key: &str) -> Result<NodeId> {
    get_with(arena, root, key, &LookupConfig::default())
}

pub fn get_with(arena: &DomArena, root: NodeId, key: &str, config: &LookupConfig) -> Result<NodeId> {
    find_by_keys(arena, root, key, config).ok_or_else(|| {
        tracing::debug!(key, "node lookup failed");
        DomError::NodeLookup(key.to_string())
    })
}

/// Like [`get`], but a miss is `None`
pub fn get_if_exists(arena: &DomArena, root: NodeId, key: &str) -> Option<NodeId> {
    get_if_exists_with(arena, root, key, &LookupConfig::default())
}

pub fn get_if_exists_with(
    arena: &DomArena,
    root: NodeId,
    key: &str,
    config: &LookupConfig,
) -> Option<NodeId> {
    find_by_keys(arena, root, key, config)
}

/// [`get`], then clear the found element's children
pub fn get_and_clear(arena: &mut DomArena, root: NodeId, key: &str) -> Result<NodeId> {
    get_and_clear_with(arena, root, key, &LookupConfig::default())
}

pub fn get_and_clear_with(
    arena: &mut DomArena,
    root: NodeId,
    key: &str,
    config: &LookupConfig,
) -> Result<NodeId> {
    let node = get_with(arena, root, key, config)?;
    query::clear_node(arena, node);
    Ok(node)
}
