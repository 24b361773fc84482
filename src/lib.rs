//! Trellis
//!
//! A minimal graph data layer over an embedded key-value store. Nodes
//! and edges carry free-form property maps and are addressed by string
//! ids; a per-node adjacency index keeps incident edge ids queryable in
//! both directions and feeds breadth-first traversal.
//!
//! # Architecture
//!
//! Three pluggable seams:
//! - [`backend::Backend`]: byte-level storage partitioned into nodes,
//!   edges, and adjacency. In-memory, RocksDB, and redb engines ship
//!   behind feature gates.
//! - [`codec::Codec`]: payload byte format. JSON for debuggability,
//!   bincode for density.
//! - [`graph::IdGenerator`]: id minting for `create_*` operations,
//!   UUID v4 by default.
//!
//! Writes are single-call atomic at the backend. Bulk ingestion batches
//! edge payloads and adjacency merges into one write each.
//!
//! ## Example Usage
//!
//! ```rust
//! use trellis::backend::MemoryBackend;
//! use trellis::codec::JsonCodec;
//! use trellis::graph::{Direction, Edge, GraphStore, Node, NodeId};
//!
//! let mut store = GraphStore::new(MemoryBackend::new(), JsonCodec);
//!
//! store.put_node(&Node::new("alice")).unwrap();
//! store.put_node(&Node::new("bob")).unwrap();
//! store.put_edge(&Edge::new("knows", "alice", "bob")).unwrap();
//!
//! let reachable = store.bfs(&NodeId::new("alice"), Direction::Any).unwrap();
//! assert_eq!(reachable.len(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod codec;
pub mod graph;

// Re-export main types for convenience
pub use backend::{Backend, BackendError, BackendResult, MemoryBackend, Partition};
pub use codec::{BincodeCodec, Codec, CodecError, CodecResult, EntityCodec, JsonCodec};
pub use graph::{
    Direction, Edge, EdgeId, GraphStore, Node, NodeId, PropertyMap, PropertyValue, StoreError,
    StoreResult,
};

#[cfg(feature = "rocksdb-backend")]
pub use backend::{RocksDbBackend, RocksDbConfig};

#[cfg(feature = "redb-backend")]
pub use backend::RedbBackend;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
