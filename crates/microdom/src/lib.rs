//! Minimal DOM tree with structural query helpers
//!
//! Navigate and edit an already-parsed markup tree without hand-written
//! tree walks: tag search, text gathering, id/class lookup, attribute
//! search with nesting control, parent chains, subtree clearing.
//!
//! ## Philosophy
//!
//! - **Good taste**: Data structures first, algorithms follow naturally
//! - **No special cases**: One pre-order walk underlies every query
//! - **No hidden state**: Nothing is indexed, every query re-walks the tree
//!
//! ## Core Design
//!
//! ```text
//! JSON / external parser → DomArena (owned) → PreOrder walk → query / lookup
//!                                ↓
//!                          NodeId (u32)
//! ```

pub mod arena;
pub mod builder;
pub mod error;
pub mod lookup;
pub mod query;
pub mod types;
pub mod utils;
pub mod walk;

pub use arena::{DomArena, DOCUMENT_ID};
pub use builder::{BuilderConfig, TreeBuilder};
pub use error::{DomError, Result};
pub use lookup::{get, get_and_clear, get_if_exists, LookupConfig};
pub use query::{
    clear_node, find_elements_with_attribute, find_nodes_named, gather_text_nodes,
    get_elements_by_tag_name, get_parents, locate_nodes, TextOptions,
};
pub use types::*;
pub use walk::PreOrder;
