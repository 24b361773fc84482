//! In-memory backend for tests and ephemeral graphs
//!
//! Ordered maps so `scan` and `multi_get` behave exactly like the
//! persistent engines, without touching disk.

use super::{Backend, BackendError, BackendResult, Partition};
use std::collections::BTreeMap;
use tracing::debug;

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// Non-persistent backend holding one ordered map per partition
#[derive(Debug, Default)]
pub struct MemoryBackend {
    nodes: Map,
    edges: Map,
    adjacency: Map,
    closed: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, partition: Partition) -> BackendResult<&Map> {
        if self.closed {
            return Err(BackendError::Closed);
        }
        Ok(match partition {
            Partition::Nodes => &self.nodes,
            Partition::Edges => &self.edges,
            Partition::Adjacency => &self.adjacency,
        })
    }

    fn map_mut(&mut self, partition: Partition) -> BackendResult<&mut Map> {
        if self.closed {
            return Err(BackendError::Closed);
        }
        Ok(match partition {
            Partition::Nodes => &mut self.nodes,
            Partition::Edges => &mut self.edges,
            Partition::Adjacency => &mut self.adjacency,
        })
    }
}

impl Backend for MemoryBackend {
    fn get(&self, partition: Partition, key: &[u8]) -> BackendResult<Option<Vec<u8>>> {
        Ok(self.map(partition)?.get(key).cloned())
    }

    fn put(&mut self, partition: Partition, key: &[u8], value: &[u8]) -> BackendResult<()> {
        self.map_mut(partition)?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, partition: Partition, key: &[u8]) -> BackendResult<()> {
        self.map_mut(partition)?.remove(key);
        Ok(())
    }

    fn multi_get(
        &self,
        partition: Partition,
        keys: &[Vec<u8>],
    ) -> BackendResult<Vec<Option<Vec<u8>>>> {
        let map = self.map(partition)?;
        Ok(keys.iter().map(|k| map.get(k.as_slice()).cloned()).collect())
    }

    fn multi_put(
        &mut self,
        partition: Partition,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
    ) -> BackendResult<()> {
        let map = self.map_mut(partition)?;
        for (key, value) in entries {
            map.insert(key, value);
        }
        Ok(())
    }

    fn scan(&self, partition: Partition) -> BackendResult<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .map(partition)?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn flush(&mut self) -> BackendResult<()> {
        if self.closed {
            return Err(BackendError::Closed);
        }
        Ok(())
    }

    fn close(&mut self) -> BackendResult<()> {
        if self.closed {
            return Err(BackendError::Closed);
        }
        self.closed = true;
        debug!("Closed in-memory backend");
        Ok(())
    }
}
