//! Adjacency index
//!
//! Tracks, per node, the edge ids leaving and entering it. Records live
//! in the adjacency partition under the node id, separate from the node
//! payload itself, so touching the index never rewrites entity data.

use super::store::StoreResult;
use super::types::{EdgeId, NodeId};
use super::Edge;
use crate::backend::{Backend, Partition};
use crate::codec::{Codec, EntityCodec};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::debug;

/// Which side of a node's adjacency to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edges whose source is the node
    Forward,
    /// Edges whose target is the node
    Backward,
    /// Union of both sides, deduplicated
    Any,
}

/// Edge ids incident to one node
///
/// A node with no incident edges has no record at all; the index never
/// stores an empty record. Sets keep the payload sorted and free of
/// duplicates without an extra pass at encode time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyRecord {
    pub outgoing: BTreeSet<EdgeId>,
    pub incoming: BTreeSet<EdgeId>,
}

impl AdjacencyRecord {
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}

/// Maintains adjacency records alongside edge writes
///
/// Callers pass the backend into each operation so the surrounding
/// store can keep borrowing it for entity reads.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex<C: Codec> {
    codec: EntityCodec<C>,
}

impl<C: Codec> AdjacencyIndex<C> {
    pub fn new(codec: EntityCodec<C>) -> Self {
        AdjacencyIndex { codec }
    }

    fn load<B: Backend>(&self, backend: &B, node: &NodeId) -> StoreResult<AdjacencyRecord> {
        match backend.get(Partition::Adjacency, node.as_bytes())? {
            Some(bytes) => Ok(self.codec.decode_adjacency(&bytes)?),
            None => Ok(AdjacencyRecord::default()),
        }
    }

    fn save<B: Backend>(
        &self,
        backend: &mut B,
        node: &NodeId,
        record: &AdjacencyRecord,
    ) -> StoreResult<()> {
        if record.is_empty() {
            backend.delete(Partition::Adjacency, node.as_bytes())?;
        } else {
            let bytes = self.codec.encode_adjacency(record)?;
            backend.put(Partition::Adjacency, node.as_bytes(), &bytes)?;
        }
        Ok(())
    }

    /// Register `edge` under both endpoints
    ///
    /// A self-loop touches a single record, updating both of its sets in
    /// one read and one write.
    pub fn record_edge<B: Backend>(&self, backend: &mut B, edge: &Edge) -> StoreResult<()> {
        if edge.is_self_loop() {
            let mut record = self.load(backend, &edge.source)?;
            record.outgoing.insert(edge.id.clone());
            record.incoming.insert(edge.id.clone());
            self.save(backend, &edge.source, &record)?;
        } else {
            let mut source = self.load(backend, &edge.source)?;
            source.outgoing.insert(edge.id.clone());
            self.save(backend, &edge.source, &source)?;

            let mut target = self.load(backend, &edge.target)?;
            target.incoming.insert(edge.id.clone());
            self.save(backend, &edge.target, &target)?;
        }
        Ok(())
    }

    /// Drop `edge` from both endpoints, deleting records that empty out
    pub fn remove_edge<B: Backend>(&self, backend: &mut B, edge: &Edge) -> StoreResult<()> {
        if edge.is_self_loop() {
            let mut record = self.load(backend, &edge.source)?;
            let changed =
                record.outgoing.remove(&edge.id) | record.incoming.remove(&edge.id);
            if changed {
                self.save(backend, &edge.source, &record)?;
            }
        } else {
            let mut source = self.load(backend, &edge.source)?;
            if source.outgoing.remove(&edge.id) {
                self.save(backend, &edge.source, &source)?;
            }

            let mut target = self.load(backend, &edge.target)?;
            if target.incoming.remove(&edge.id) {
                self.save(backend, &edge.target, &target)?;
            }
        }
        Ok(())
    }

    /// Edge ids incident to `node`, sorted ascending
    ///
    /// A node without a record yields an empty list.
    pub fn query<B: Backend>(
        &self,
        backend: &B,
        node: &NodeId,
        direction: Direction,
    ) -> StoreResult<Vec<EdgeId>> {
        let record = self.load(backend, node)?;
        let edges = match direction {
            Direction::Forward => record.outgoing.iter().cloned().collect(),
            Direction::Backward => record.incoming.iter().cloned().collect(),
            Direction::Any => record.outgoing.union(&record.incoming).cloned().collect(),
        };
        Ok(edges)
    }

    /// Register a batch of edges with one read and one write per
    /// distinct endpoint
    ///
    /// Accumulates all additions in memory first, then merges them into
    /// the stored records via a single `multi_get` and a single atomic
    /// `multi_put`.
    pub fn record_edges_bulk<B: Backend>(
        &self,
        backend: &mut B,
        edges: &[Edge],
    ) -> StoreResult<()> {
        if edges.is_empty() {
            return Ok(());
        }

        let mut pending: FxHashMap<NodeId, AdjacencyRecord> = FxHashMap::default();
        for edge in edges {
            pending
                .entry(edge.source.clone())
                .or_default()
                .outgoing
                .insert(edge.id.clone());
            pending
                .entry(edge.target.clone())
                .or_default()
                .incoming
                .insert(edge.id.clone());
        }

        // Deterministic key order for the batched read and write
        let mut nodes: Vec<NodeId> = pending.keys().cloned().collect();
        nodes.sort();

        let keys: Vec<Vec<u8>> = nodes.iter().map(|n| n.as_bytes().to_vec()).collect();
        let existing = backend.multi_get(Partition::Adjacency, &keys)?;

        let mut entries = Vec::with_capacity(nodes.len());
        for (node, bytes) in nodes.iter().zip(existing) {
            let mut record = match bytes {
                Some(bytes) => self.codec.decode_adjacency(&bytes)?,
                None => AdjacencyRecord::default(),
            };
            if let Some(additions) = pending.remove(node) {
                record.outgoing.extend(additions.outgoing);
                record.incoming.extend(additions.incoming);
            }
            entries.push((node.as_bytes().to_vec(), self.codec.encode_adjacency(&record)?));
        }

        backend.multi_put(Partition::Adjacency, entries)?;

        debug!(
            "Recorded adjacency for {} nodes from {} edges",
            nodes.len(),
            edges.len()
        );

        Ok(())
    }
}
