//! Tree builder - construct a `DomArena` from JSON
//!
//! Markup parsing lives elsewhere; this is the seam where an external
//! parser (or a test) hands over an already-shaped tree.
//!
//! Accepted node shapes:
//! ```json
//! {"name": "a", "attributes": {"id": "x"}, "children": [...]}
//! {"text": "character data"}
//! "bare strings are text too"
//! ```
//! The top level is either one element object or an array of nodes, which
//! become children of the Document.

use crate::arena::{DomArena, DOCUMENT_ID};
use crate::error::{DomError, Result};
use crate::types::NodeId;
use serde_json::Value;

/// Configuration for the tree builder
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Deepest element nesting accepted before giving up
    pub max_depth: usize,
    /// Skip text nodes that are empty or whitespace-only
    pub drop_whitespace_text: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            drop_whitespace_text: false,
        }
    }
}

/// Builds document trees from JSON values
pub struct TreeBuilder {
    config: BuilderConfig,
}

impl TreeBuilder {
    /// Create a builder with default config
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create a builder with custom config
    pub fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Parse JSON text and build a tree
    pub fn build_str(&self, json: &str) -> Result<DomArena> {
        let value: Value = serde_json::from_str(json)?;
        self.build(&value)
    }

    /// Build a fresh tree from a JSON value
    pub fn build(&self, value: &Value) -> Result<DomArena> {
        let mut arena = DomArena::new();
        match value {
            Value::Array(nodes) => {
                for node in nodes {
                    self.build_into(&mut arena, DOCUMENT_ID, node)?;
                }
            }
            Value::Object(_) => {
                self.build_into(&mut arena, DOCUMENT_ID, value)?;
            }
            other => {
                return Err(DomError::Build(format!(
                    "top level must be an object or array, got {}",
                    json_kind(other)
                )))
            }
        }
        tracing::trace!(nodes = arena.len(), "built tree");
        Ok(arena)
    }

    /// Build `value` and append it under `parent` in an existing tree
    ///
    /// Returns the new node, or `None` when the input was skipped.
    pub fn build_into(
        &self,
        arena: &mut DomArena,
        parent: NodeId,
        value: &Value,
    ) -> Result<Option<NodeId>> {
        self.build_node(arena, parent, value, 0)
    }

    /// Recursively build one node
    fn build_node(
        &self,
        arena: &mut DomArena,
        parent: NodeId,
        value: &Value,
        depth: usize,
    ) -> Result<Option<NodeId>> {
        if depth > self.config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: self.config.max_depth,
            });
        }

        if value.get("name").is_some() && value.get("text").is_some() {
            return Err(DomError::Build(
                "node has both \"name\" and \"text\"".to_string(),
            ));
        }

        if let Some(text) = value.as_str().or_else(|| value["text"].as_str()) {
            if self.config.drop_whitespace_text && text.trim().is_empty() {
                return Ok(None);
            }
            return arena.text(parent, text).map(Some);
        }

        let Some(name) = value["name"].as_str() else {
            tracing::warn!(kind = json_kind(value), "skipping node without name or text");
            return Ok(None);
        };
        if name.is_empty() {
            return Err(DomError::Build("element name is empty".to_string()));
        }

        let node_id = arena.create_element(name);

        // Parse attributes
        if let Some(attrs) = value["attributes"].as_object() {
            for (key, attr) in attrs {
                let attr = match attr {
                    Value::String(s) => s.clone(),
                    Value::Null => continue,
                    other => other.to_string(),
                };
                arena.set_attribute(node_id, key.as_str(), attr)?;
            }
        }

        arena.append_child(parent, node_id)?;
        tracing::trace!(node_id, name, depth, "built element");

        // Parse children
        if let Some(children) = value["children"].as_array() {
            for child in children {
                self.build_node(arena, node_id, child, depth + 1)?;
            }
        }

        Ok(Some(node_id))
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
