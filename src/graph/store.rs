//! Graph store
//!
//! Persists nodes and edges through a pluggable [`Backend`], keeping
//! the adjacency index in step with every indexed edge write. All
//! entity payloads pass through one [`EntityCodec`], so a store opened
//! with a given codec must be reopened with the same codec.

use super::adjacency::{AdjacencyIndex, Direction};
use super::types::{EdgeId, IdGenerator, NodeId, UuidGenerator};
use super::{Edge, Node, PropertyMap};
use crate::backend::{Backend, BackendError, Partition};
use crate::codec::{Codec, CodecError, EntityCodec};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by graph store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Graph data layer over an embedded key-value backend
///
/// Nodes and edges are stored by id in their own partitions; the
/// adjacency partition carries one record per node listing incident
/// edge ids. Single-writer: mutating operations take `&mut self`.
/// Atomicity stops at the backend call, so operations spanning several
/// calls (indexed edge writes, deletes, updates) can leave a partial
/// result behind if one interrupts mid-way.
pub struct GraphStore<B: Backend, C: Codec> {
    backend: B,
    codec: EntityCodec<C>,
    adjacency: AdjacencyIndex<C>,
    ids: Box<dyn IdGenerator>,
}

impl<B: Backend, C: Codec> GraphStore<B, C> {
    /// Create a store over `backend`, minting UUID ids for `create_*`
    pub fn new(backend: B, codec: C) -> Self {
        Self::with_id_generator(backend, codec, UuidGenerator)
    }

    /// Create a store with a caller-chosen id generator
    pub fn with_id_generator(backend: B, codec: C, ids: impl IdGenerator + 'static) -> Self {
        let codec = EntityCodec::new(codec);
        let adjacency = AdjacencyIndex::new(codec.clone());
        GraphStore {
            backend,
            codec,
            adjacency,
            ids: Box::new(ids),
        }
    }

    /// Store a node, overwriting any previous payload under its id
    pub fn put_node(&mut self, node: &Node) -> StoreResult<()> {
        let bytes = self.codec.encode_node(node)?;
        self.backend.put(Partition::Nodes, node.id.as_bytes(), &bytes)?;
        debug!("Stored node: {}", node.id);
        Ok(())
    }

    /// Fetch a node by id
    pub fn get_node(&self, id: &NodeId) -> StoreResult<Option<Node>> {
        match self.backend.get(Partition::Nodes, id.as_bytes())? {
            Some(bytes) => Ok(Some(self.codec.decode_node(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete a node payload; absent ids are a no-op
    ///
    /// Edges referencing the node and its adjacency record stay in
    /// place. Traversal tolerates the resulting dangling references.
    pub fn delete_node(&mut self, id: &NodeId) -> StoreResult<()> {
        self.backend.delete(Partition::Nodes, id.as_bytes())?;
        debug!("Deleted node: {}", id);
        Ok(())
    }

    /// Store an edge and register it under both endpoints
    pub fn put_edge(&mut self, edge: &Edge) -> StoreResult<()> {
        self.put_edge_unindexed(edge)?;
        self.adjacency.record_edge(&mut self.backend, edge)?;
        Ok(())
    }

    /// Store an edge payload without touching the adjacency index
    ///
    /// For rebuild and repair flows; edges written this way are
    /// invisible to [`GraphStore::adjacent_edges`] and traversal.
    pub fn put_edge_unindexed(&mut self, edge: &Edge) -> StoreResult<()> {
        let bytes = self.codec.encode_edge(edge)?;
        self.backend.put(Partition::Edges, edge.id.as_bytes(), &bytes)?;
        debug!("Stored edge: {} ({} -> {})", edge.id, edge.source, edge.target);
        Ok(())
    }

    /// Fetch an edge by id
    pub fn get_edge(&self, id: &EdgeId) -> StoreResult<Option<Edge>> {
        match self.backend.get(Partition::Edges, id.as_bytes())? {
            Some(bytes) => Ok(Some(self.codec.decode_edge(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete an edge and unregister it from both endpoints
    ///
    /// Absent ids are a no-op.
    pub fn delete_edge(&mut self, id: &EdgeId) -> StoreResult<()> {
        let Some(edge) = self.get_edge(id)? else {
            return Ok(());
        };
        self.adjacency.remove_edge(&mut self.backend, &edge)?;
        self.backend.delete(Partition::Edges, id.as_bytes())?;
        debug!("Deleted edge: {}", id);
        Ok(())
    }

    /// Merge properties into a node, creating it when missing
    ///
    /// `merge` receives the stored properties (empty for a new node)
    /// and the incoming ones, and decides the result. Returns the node
    /// as written.
    pub fn update_node(
        &mut self,
        id: &NodeId,
        new_data: PropertyMap,
        merge: impl FnOnce(&PropertyMap, PropertyMap) -> PropertyMap,
    ) -> StoreResult<Node> {
        let existing = self
            .get_node(id)?
            .unwrap_or_else(|| Node::new(id.clone()));
        let merged = merge(&existing.properties, new_data);
        let node = Node::new_with_properties(existing.id, merged);
        self.put_node(&node)?;
        debug!("Updated node: {}", node.id);
        Ok(node)
    }

    /// Merge properties into an edge, creating a placeholder when
    /// missing
    ///
    /// A placeholder edge has empty-string endpoints and goes through
    /// the normal indexed write path. Endpoints of an existing edge are
    /// preserved untouched.
    pub fn update_edge(
        &mut self,
        id: &EdgeId,
        new_data: PropertyMap,
        merge: impl FnOnce(&PropertyMap, PropertyMap) -> PropertyMap,
    ) -> StoreResult<Edge> {
        let existing = self
            .get_edge(id)?
            .unwrap_or_else(|| Edge::new(id.clone(), "", ""));
        let merged = merge(&existing.properties, new_data);
        let edge = Edge::new_with_properties(existing.id, existing.source, existing.target, merged);
        self.put_edge(&edge)?;
        debug!("Updated edge: {}", edge.id);
        Ok(edge)
    }

    /// Store a batch of nodes in one atomic write
    pub fn put_nodes(&mut self, nodes: &[Node]) -> StoreResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        let mut entries = Vec::with_capacity(nodes.len());
        for node in nodes {
            entries.push((node.id.as_bytes().to_vec(), self.codec.encode_node(node)?));
        }
        self.backend.multi_put(Partition::Nodes, entries)?;
        debug!("Stored {} nodes", nodes.len());
        Ok(())
    }

    /// Fetch nodes by id; the result aligns with `ids`, `None` for
    /// missing entries
    pub fn get_nodes(&self, ids: &[NodeId]) -> StoreResult<Vec<Option<Node>>> {
        let keys: Vec<Vec<u8>> = ids.iter().map(|id| id.as_bytes().to_vec()).collect();
        let values = self.backend.multi_get(Partition::Nodes, &keys)?;
        let mut nodes = Vec::with_capacity(values.len());
        for value in values {
            nodes.push(match value {
                Some(bytes) => Some(self.codec.decode_node(&bytes)?),
                None => None,
            });
        }
        Ok(nodes)
    }

    /// Fetch edges by id; the result aligns with `ids`
    pub fn get_edges(&self, ids: &[EdgeId]) -> StoreResult<Vec<Option<Edge>>> {
        let keys: Vec<Vec<u8>> = ids.iter().map(|id| id.as_bytes().to_vec()).collect();
        let values = self.backend.multi_get(Partition::Edges, &keys)?;
        let mut edges = Vec::with_capacity(values.len());
        for value in values {
            edges.push(match value {
                Some(bytes) => Some(self.codec.decode_edge(&bytes)?),
                None => None,
            });
        }
        Ok(edges)
    }

    /// Store a batch of edges and their adjacency updates
    ///
    /// Edge payloads land in one atomic write, then the index merges
    /// all endpoint updates with one read and one write per distinct
    /// node. Equivalent to calling [`GraphStore::put_edge`] per edge.
    pub fn put_edges_bulk(&mut self, edges: &[Edge]) -> StoreResult<()> {
        if edges.is_empty() {
            return Ok(());
        }
        let mut entries = Vec::with_capacity(edges.len());
        for edge in edges {
            entries.push((edge.id.as_bytes().to_vec(), self.codec.encode_edge(edge)?));
        }
        self.backend.multi_put(Partition::Edges, entries)?;
        self.adjacency.record_edges_bulk(&mut self.backend, edges)?;
        debug!("Stored {} edges", edges.len());
        Ok(())
    }

    /// Store a new node under a freshly minted id
    pub fn create_node(&mut self, properties: PropertyMap) -> StoreResult<Node> {
        let node = Node::new_with_properties(self.ids.generate(), properties);
        self.put_node(&node)?;
        Ok(node)
    }

    /// Store a new edge under a freshly minted id
    pub fn create_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        properties: PropertyMap,
    ) -> StoreResult<Edge> {
        let edge = Edge::new_with_properties(
            self.ids.generate(),
            source.clone(),
            target.clone(),
            properties,
        );
        self.put_edge(&edge)?;
        Ok(edge)
    }

    /// Edge ids incident to `node`, sorted ascending
    pub fn adjacent_edges(&self, node: &NodeId, direction: Direction) -> StoreResult<Vec<EdgeId>> {
        self.adjacency.query(&self.backend, node, direction)
    }

    /// All stored nodes in ascending id order
    pub fn scan_nodes(&self) -> StoreResult<Vec<Node>> {
        let mut nodes = Vec::new();
        for (_, bytes) in self.backend.scan(Partition::Nodes)? {
            nodes.push(self.codec.decode_node(&bytes)?);
        }
        Ok(nodes)
    }

    /// All stored edges in ascending id order
    pub fn scan_edges(&self) -> StoreResult<Vec<Edge>> {
        let mut edges = Vec::new();
        for (_, bytes) in self.backend.scan(Partition::Edges)? {
            edges.push(self.codec.decode_edge(&bytes)?);
        }
        Ok(edges)
    }

    /// Flush buffered writes to durable storage
    pub fn flush(&mut self) -> StoreResult<()> {
        self.backend.flush()?;
        Ok(())
    }

    /// Flush and release the underlying backend
    pub fn close(mut self) -> StoreResult<()> {
        self.backend.close()?;
        debug!("Closed graph store");
        Ok(())
    }
}
