//! Core graph data model and storage
//!
//! This module implements the graph layer:
//! - Nodes and edges identified by string ids, carrying property maps
//! - A per-node adjacency index split into outgoing and incoming sets
//! - [`GraphStore`], tying entities and index together over a backend
//! - Breadth-first traversal over the adjacency index

pub mod adjacency;
pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod traversal;
pub mod types;

// Re-export main types
pub use adjacency::{AdjacencyRecord, Direction};
pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphStore, StoreError, StoreResult};
pub use types::{EdgeId, IdGenerator, NodeId, SequentialIdGenerator, UuidGenerator};
