//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. The query layer only ever raises
//! `NodeLookup`; the rest belongs to tree construction and arena access.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    /// No element carries the key as any of the lookup attributes
    #[error("Node lookup failed: {0}")]
    NodeLookup(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Hierarchy error: {0}")]
    Hierarchy(String),

    #[error("Build error: {0}")]
    Build(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Maximum tree depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },
}

impl DomError {
    /// The key that failed to resolve, for `NodeLookup` errors
    pub fn lookup_key(&self) -> Option<&str> {
        match self {
            DomError::NodeLookup(key) => Some(key),
            _ => None,
        }
    }
}
