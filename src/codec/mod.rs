//! Pluggable byte codecs for entity payloads
//!
//! A [`Codec`] turns any serde value into bytes and back; the codec has no
//! entity awareness. [`EntityCodec`] layers the per-kind wire shapes on top,
//! so nodes, edges, and adjacency records each get a distinct payload
//! regardless of which codec produces the bytes.

use crate::graph::adjacency::AdjacencyRecord;
use crate::graph::{Edge, EdgeId, Node, PropertyMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Codec errors
///
/// The underlying serde error types differ per codec and are not `Clone`,
/// so both variants carry the rendered error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Value could not be encoded
    #[error("encode error: {0}")]
    Encode(String),

    /// Bytes could not be decoded; the payload is corrupt or was written
    /// by a different codec
    #[error("decode error: {0}")]
    Decode(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Converts serializable values to and from byte payloads
///
/// `decode` must be the inverse of `encode` for every value `encode`
/// ever produced. Implementations are stateless and cheap to clone.
pub trait Codec: Clone {
    fn encode<T: Serialize>(&self, value: &T) -> CodecResult<Vec<u8>>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T>;
}

/// Human-readable JSON payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Compact binary payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> CodecResult<Vec<u8>> {
        bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Serialized node for storage
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeRepr {
    id: String,
    properties: PropertyMap,
}

/// Serialized edge for storage
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRepr {
    id: String,
    source: String,
    target: String,
    properties: PropertyMap,
}

/// Serialized adjacency record for storage
///
/// The node id is the storage key, not part of the payload. Both
/// sequences are written sorted and deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdjacencyRepr {
    outgoing: Vec<String>,
    incoming: Vec<String>,
}

/// Entity-kind-aware wrapper around a [`Codec`]
///
/// Swapping the inner codec changes the byte format only, never the
/// wire shape of an entity kind.
#[derive(Debug, Clone)]
pub struct EntityCodec<C: Codec> {
    inner: C,
}

impl<C: Codec> EntityCodec<C> {
    pub fn new(inner: C) -> Self {
        EntityCodec { inner }
    }

    pub fn encode_node(&self, node: &Node) -> CodecResult<Vec<u8>> {
        let repr = NodeRepr {
            id: node.id.as_str().to_string(),
            properties: node.properties.clone(),
        };
        self.inner.encode(&repr)
    }

    pub fn decode_node(&self, bytes: &[u8]) -> CodecResult<Node> {
        let repr: NodeRepr = self.inner.decode(bytes)?;
        Ok(Node::new_with_properties(repr.id, repr.properties))
    }

    pub fn encode_edge(&self, edge: &Edge) -> CodecResult<Vec<u8>> {
        let repr = EdgeRepr {
            id: edge.id.as_str().to_string(),
            source: edge.source.as_str().to_string(),
            target: edge.target.as_str().to_string(),
            properties: edge.properties.clone(),
        };
        self.inner.encode(&repr)
    }

    pub fn decode_edge(&self, bytes: &[u8]) -> CodecResult<Edge> {
        let repr: EdgeRepr = self.inner.decode(bytes)?;
        Ok(Edge::new_with_properties(
            repr.id,
            repr.source,
            repr.target,
            repr.properties,
        ))
    }

    pub fn encode_adjacency(&self, record: &AdjacencyRecord) -> CodecResult<Vec<u8>> {
        // BTreeSet iteration is already sorted and deduplicated
        let repr = AdjacencyRepr {
            outgoing: record.outgoing.iter().map(|e| e.as_str().to_string()).collect(),
            incoming: record.incoming.iter().map(|e| e.as_str().to_string()).collect(),
        };
        self.inner.encode(&repr)
    }

    pub fn decode_adjacency(&self, bytes: &[u8]) -> CodecResult<AdjacencyRecord> {
        let repr: AdjacencyRepr = self.inner.decode(bytes)?;
        Ok(AdjacencyRecord {
            outgoing: repr.outgoing.into_iter().map(EdgeId::new).collect(),
            incoming: repr.incoming.into_iter().map(EdgeId::new).collect(),
        })
    }
}
