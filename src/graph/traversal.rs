//! Breadth-first traversal
//!
//! Walks the adjacency index layer by layer. Traversal reads only the
//! adjacency and edge partitions; node payloads are never consulted, so
//! ids without a stored node still participate.

use super::adjacency::Direction;
use super::store::{GraphStore, StoreResult};
use super::types::NodeId;
use crate::backend::Backend;
use crate::codec::Codec;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

impl<B: Backend, C: Codec> GraphStore<B, C> {
    /// Node ids reachable from `start`, in first-discovery order
    ///
    /// `start` is always the first entry, whether or not a node payload
    /// exists for it. Edge ids in the index whose edge record is
    /// missing are skipped silently. Neighbors expand in sorted edge id
    /// order, so the result is deterministic for a given graph.
    pub fn bfs(&self, start: &NodeId, direction: Direction) -> StoreResult<Vec<NodeId>> {
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start.clone());

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            order.push(current.clone());

            for edge_id in self.adjacent_edges(&current, direction)? {
                let Some(edge) = self.get_edge(&edge_id)? else {
                    continue;
                };
                let neighbor = edge.other_endpoint(&current);
                if !visited.contains(neighbor) {
                    queue.push_back(neighbor.clone());
                }
            }
        }

        Ok(order)
    }
}
