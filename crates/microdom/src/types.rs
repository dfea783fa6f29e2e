//! Core node model
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Node kind is a sum type, traversal matches on it
//! 3. Use SmallVec for child lists (most nodes have few children)
//! 4. Parent links are plain indices, never owning

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any document
pub type NodeId = u32;

/// Attribute name → value. Keys are unique, iteration order is unspecified.
pub type Attributes = HashMap<String, String, ahash::RandomState>;

/// Node type matching DOM specification numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Document = 9,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Element => "element",
            NodeType::Text => "text",
            NodeType::Document => "document",
        }
    }
}

/// Element payload: tag name (case as given) plus attributes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: Attributes,
}

impl ElementData {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: Attributes::default(),
        }
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

/// A node stored in the arena
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
/// - `parent_id` is a lookup link only; the child list is the ownership edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,
    pub data: NodeData,
}

impl DomNode {
    pub fn new(node_id: NodeId, data: NodeData) -> Self {
        Self {
            node_id,
            parent_id: None,
            children_ids: SmallVec::new(),
            data,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element(element) => Some(&element.tag_name),
            _ => None,
        }
    }

    /// Character data for text nodes
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    pub fn element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get attribute value (exact name match)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element()
            .and_then(|element| element.attributes.get(name))
            .map(|s| s.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children_ids.is_empty()
    }
}
