//! Pluggable key-value storage engines
//!
//! The graph layer talks to storage through the [`Backend`] trait: point
//! and bulk CRUD over opaque byte keys and values, partitioned into the
//! three namespaces the graph uses. One implementation exists per engine;
//! the store is generic over which one it gets.

pub mod memory;

#[cfg(feature = "redb-backend")]
pub mod redb;
#[cfg(feature = "rocksdb-backend")]
pub mod rocksdb;

pub use memory::MemoryBackend;

#[cfg(feature = "redb-backend")]
pub use self::redb::RedbBackend;
#[cfg(feature = "rocksdb-backend")]
pub use self::rocksdb::{RocksDbBackend, RocksDbConfig};

use thiserror::Error;

/// Logical namespace within a backend
///
/// Maps to a column family in RocksDB, a table in redb, and a separate
/// map in the in-memory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Nodes,
    Edges,
    Adjacency,
}

impl Partition {
    /// All partitions, in the order engines create them
    pub const ALL: [Partition; 3] = [Partition::Nodes, Partition::Edges, Partition::Adjacency];

    /// Stable name used for column families and tables
    pub fn name(&self) -> &'static str {
        match self {
            Partition::Nodes => "nodes",
            Partition::Edges => "edges",
            Partition::Adjacency => "adjacency",
        }
    }
}

/// Storage engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Engine-level failure (I/O, corruption, missing namespace)
    #[error("storage engine error: {0}")]
    Engine(String),

    /// Operation attempted after `close`
    #[error("backend is closed")]
    Closed,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Blocking key-value storage capability
///
/// Atomicity covers exactly one call: `multi_put` applies its whole batch
/// or nothing, but no guarantee spans a sequence of calls. After `close`
/// every operation fails with [`BackendError::Closed`].
pub trait Backend {
    /// Point read; `None` when the key is absent
    fn get(&self, partition: Partition, key: &[u8]) -> BackendResult<Option<Vec<u8>>>;

    /// Insert or overwrite one entry
    fn put(&mut self, partition: Partition, key: &[u8], value: &[u8]) -> BackendResult<()>;

    /// Remove one entry; absent keys are a no-op
    fn delete(&mut self, partition: Partition, key: &[u8]) -> BackendResult<()>;

    /// Batched read; the result is aligned with `keys`
    fn multi_get(
        &self,
        partition: Partition,
        keys: &[Vec<u8>],
    ) -> BackendResult<Vec<Option<Vec<u8>>>>;

    /// Atomic batched write; the whole batch applies or none of it
    fn multi_put(
        &mut self,
        partition: Partition,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
    ) -> BackendResult<()>;

    /// All entries of a partition in ascending key order
    fn scan(&self, partition: Partition) -> BackendResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Push buffered writes to the engine's durable layer
    fn flush(&mut self) -> BackendResult<()>;

    /// Release the engine; all further calls fail
    fn close(&mut self) -> BackendResult<()>;
}
