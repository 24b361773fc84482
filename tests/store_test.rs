//! Integration tests for the graph store over the in-memory backend
//!
//! The core scenarios run once per codec; payload bytes differ but
//! every observable behavior must match.

use trellis::backend::MemoryBackend;
use trellis::codec::{BincodeCodec, Codec, JsonCodec};
use trellis::graph::{
    Direction, Edge, EdgeId, GraphStore, Node, NodeId, PropertyMap, PropertyValue,
};

fn memory_store<C: Codec>(codec: C) -> GraphStore<MemoryBackend, C> {
    GraphStore::new(MemoryBackend::new(), codec)
}

fn props(pairs: &[(&str, PropertyValue)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn merge_incoming_wins(existing: &PropertyMap, incoming: PropertyMap) -> PropertyMap {
    let mut merged = existing.clone();
    merged.extend(incoming);
    merged
}

fn node_round_trip<C: Codec>(codec: C) {
    let mut store = memory_store(codec);
    let node = Node::new_with_properties(
        "n1",
        props(&[
            ("name", PropertyValue::String("Alice".to_string())),
            ("age", PropertyValue::Integer(30)),
        ]),
    );
    store.put_node(&node).unwrap();

    let fetched = store.get_node(&NodeId::new("n1")).unwrap().unwrap();
    assert_eq!(fetched.id, node.id);
    assert_eq!(fetched.properties, node.properties);

    assert!(store.get_node(&NodeId::new("n2")).unwrap().is_none());
}

#[test]
fn test_node_round_trip_json() {
    node_round_trip(JsonCodec);
}

#[test]
fn test_node_round_trip_bincode() {
    node_round_trip(BincodeCodec);
}

fn edge_round_trip<C: Codec>(codec: C) {
    let mut store = memory_store(codec);
    let edge = Edge::new_with_properties(
        "e1",
        "n1",
        "n2",
        props(&[("weight", PropertyValue::Float(0.75))]),
    );
    store.put_edge(&edge).unwrap();

    let fetched = store.get_edge(&EdgeId::new("e1")).unwrap().unwrap();
    assert_eq!(fetched.source, NodeId::new("n1"));
    assert_eq!(fetched.target, NodeId::new("n2"));
    assert_eq!(fetched.properties, edge.properties);
}

#[test]
fn test_edge_round_trip_json() {
    edge_round_trip(JsonCodec);
}

#[test]
fn test_edge_round_trip_bincode() {
    edge_round_trip(BincodeCodec);
}

fn triangle_traversal<C: Codec>(codec: C) {
    let mut store = memory_store(codec);
    let nodes: Vec<Node> = ["n1", "n2", "n3"].iter().map(|id| Node::new(*id)).collect();
    store.put_nodes(&nodes).unwrap();

    store.put_edge(&Edge::new("e1", "n1", "n2")).unwrap();
    store.put_edge(&Edge::new("e2", "n2", "n3")).unwrap();
    store.put_edge(&Edge::new("e3", "n3", "n1")).unwrap();

    let visited = store.bfs(&NodeId::new("n1"), Direction::Any).unwrap();
    assert_eq!(visited.len(), 3);

    let mut sorted = visited.clone();
    sorted.sort();
    assert_eq!(
        sorted,
        vec![NodeId::new("n1"), NodeId::new("n2"), NodeId::new("n3")]
    );

    // Forward-only traversal walks the cycle in edge direction
    let forward = store.bfs(&NodeId::new("n1"), Direction::Forward).unwrap();
    assert_eq!(
        forward,
        vec![NodeId::new("n1"), NodeId::new("n2"), NodeId::new("n3")]
    );
}

#[test]
fn test_triangle_traversal_json() {
    triangle_traversal(JsonCodec);
}

#[test]
fn test_triangle_traversal_bincode() {
    triangle_traversal(BincodeCodec);
}

fn bulk_node_ingestion<C: Codec>(codec: C) {
    let mut store = memory_store(codec);
    let nodes: Vec<Node> = (0..100)
        .map(|i| {
            Node::new_with_properties(
                format!("n{i:03}"),
                props(&[("index", PropertyValue::Integer(i))]),
            )
        })
        .collect();
    store.put_nodes(&nodes).unwrap();

    let ids: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
    let fetched = store.get_nodes(&ids).unwrap();
    assert_eq!(fetched.len(), 100);
    for (i, node) in fetched.iter().enumerate() {
        let node = node.as_ref().unwrap();
        assert_eq!(
            node.get_property("index"),
            Some(&PropertyValue::Integer(i as i64))
        );
    }

    assert_eq!(store.scan_nodes().unwrap().len(), 100);
}

#[test]
fn test_bulk_node_ingestion_json() {
    bulk_node_ingestion(JsonCodec);
}

#[test]
fn test_bulk_node_ingestion_bincode() {
    bulk_node_ingestion(BincodeCodec);
}

fn bulk_edge_ingestion<C: Codec>(codec: C) {
    let mut store = memory_store(codec);
    let spokes = ["n1", "n2", "n3", "n4"];
    store
        .put_nodes(
            &std::iter::once("hub")
                .chain(spokes)
                .map(Node::new)
                .collect::<Vec<_>>(),
        )
        .unwrap();

    let edges: Vec<Edge> = spokes
        .iter()
        .enumerate()
        .map(|(i, spoke)| {
            Edge::new_with_properties(
                format!("e{i}"),
                "hub",
                *spoke,
                props(&[("weight", PropertyValue::Float(i as f64 / 10.0))]),
            )
        })
        .collect();
    store.put_edges_bulk(&edges).unwrap();

    let outgoing = store
        .adjacent_edges(&NodeId::new("hub"), Direction::Forward)
        .unwrap();
    assert_eq!(outgoing.len(), 4);
    for edge in &edges {
        assert!(outgoing.contains(&edge.id));
    }

    assert!(store
        .adjacent_edges(&NodeId::new("hub"), Direction::Backward)
        .unwrap()
        .is_empty());
    for spoke in &spokes {
        let incoming = store
            .adjacent_edges(&NodeId::new(*spoke), Direction::Backward)
            .unwrap();
        assert_eq!(incoming.len(), 1);
    }

    let ids: Vec<EdgeId> = edges.iter().map(|e| e.id.clone()).collect();
    let fetched = store.get_edges(&ids).unwrap();
    assert!(fetched.iter().all(|e| e.is_some()));

    // Bulk ingestion must be indistinguishable from per-edge puts
    let mut sequential = memory_store(JsonCodec);
    for edge in &edges {
        sequential.put_edge(edge).unwrap();
    }
    assert_eq!(
        store
            .adjacent_edges(&NodeId::new("hub"), Direction::Any)
            .unwrap(),
        sequential
            .adjacent_edges(&NodeId::new("hub"), Direction::Any)
            .unwrap()
    );
}

#[test]
fn test_bulk_edge_ingestion_json() {
    bulk_edge_ingestion(JsonCodec);
}

#[test]
fn test_bulk_edge_ingestion_bincode() {
    bulk_edge_ingestion(BincodeCodec);
}

fn bulk_triangle_adjacency<C: Codec>(codec: C) {
    let mut store = memory_store(codec);
    store
        .put_nodes(&[Node::new("a"), Node::new("b"), Node::new("c")])
        .unwrap();

    let edge = |id: &str, s: &str, t: &str, w: i64| {
        Edge::new_with_properties(id, s, t, props(&[("weight", PropertyValue::Integer(w))]))
    };
    store
        .put_edges_bulk(&[
            edge("ab", "a", "b", 1),
            edge("bc", "b", "c", 2),
            edge("ac", "a", "c", 3),
        ])
        .unwrap();

    let a_edges = store
        .adjacent_edges(&NodeId::new("a"), Direction::Any)
        .unwrap();
    assert!(a_edges.contains(&EdgeId::new("ab")));
    assert!(a_edges.contains(&EdgeId::new("ac")));
    assert_eq!(a_edges.len(), 2);

    let b_edges = store
        .adjacent_edges(&NodeId::new("b"), Direction::Any)
        .unwrap();
    assert!(b_edges.contains(&EdgeId::new("ab")));
    assert!(b_edges.contains(&EdgeId::new("bc")));
    assert_eq!(b_edges.len(), 2);

    let visited = store.bfs(&NodeId::new("a"), Direction::Any).unwrap();
    assert_eq!(visited.len(), 3);
}

#[test]
fn test_bulk_triangle_adjacency_json() {
    bulk_triangle_adjacency(JsonCodec);
}

#[test]
fn test_bulk_triangle_adjacency_bincode() {
    bulk_triangle_adjacency(BincodeCodec);
}

#[test]
fn test_update_node_merge_incoming_wins() {
    let mut store = memory_store(JsonCodec);
    store
        .put_node(&Node::new_with_properties(
            "n1",
            props(&[
                ("name", PropertyValue::String("Alice".to_string())),
                ("age", PropertyValue::Integer(30)),
            ]),
        ))
        .unwrap();

    let updated = store
        .update_node(
            &NodeId::new("n1"),
            props(&[("age", PropertyValue::Integer(31))]),
            merge_incoming_wins,
        )
        .unwrap();

    assert_eq!(updated.get_property("age"), Some(&PropertyValue::Integer(31)));
    assert_eq!(
        updated.get_property("name"),
        Some(&PropertyValue::String("Alice".to_string()))
    );
}

#[test]
fn test_update_missing_node_creates_it() {
    let mut store = memory_store(JsonCodec);
    store
        .update_node(
            &NodeId::new("n1"),
            props(&[("seen", PropertyValue::Boolean(true))]),
            merge_incoming_wins,
        )
        .unwrap();

    let node = store.get_node(&NodeId::new("n1")).unwrap().unwrap();
    assert_eq!(node.get_property("seen"), Some(&PropertyValue::Boolean(true)));
    assert_eq!(node.property_count(), 1);
}

#[test]
fn test_update_missing_edge_creates_indexed_placeholder() {
    let mut store = memory_store(JsonCodec);
    store
        .update_edge(
            &EdgeId::new("e1"),
            props(&[("weight", PropertyValue::Float(1.0))]),
            merge_incoming_wins,
        )
        .unwrap();

    let edge = store.get_edge(&EdgeId::new("e1")).unwrap().unwrap();
    assert_eq!(edge.source, NodeId::new(""));
    assert_eq!(edge.target, NodeId::new(""));
    assert_eq!(edge.get_property("weight"), Some(&PropertyValue::Float(1.0)));

    // The placeholder is reachable through the index like any other edge
    assert_eq!(
        store
            .adjacent_edges(&NodeId::new(""), Direction::Any)
            .unwrap(),
        vec![EdgeId::new("e1")]
    );
}

#[test]
fn test_update_edge_keeps_endpoints_and_index() {
    let mut store = memory_store(JsonCodec);
    store.put_edge(&Edge::new("e1", "a", "b")).unwrap();

    let updated = store
        .update_edge(
            &EdgeId::new("e1"),
            props(&[("weight", PropertyValue::Float(2.0))]),
            merge_incoming_wins,
        )
        .unwrap();

    assert_eq!(updated.source, NodeId::new("a"));
    assert_eq!(updated.target, NodeId::new("b"));
    assert_eq!(
        store
            .adjacent_edges(&NodeId::new("a"), Direction::Forward)
            .unwrap(),
        vec![EdgeId::new("e1")]
    );
}

#[test]
fn test_delete_edge_restores_symmetry() {
    let mut store = memory_store(JsonCodec);
    store.put_edge(&Edge::new("e1", "a", "b")).unwrap();
    store.put_edge(&Edge::new("e2", "a", "c")).unwrap();
    store.delete_edge(&EdgeId::new("e1")).unwrap();

    assert!(store.get_edge(&EdgeId::new("e1")).unwrap().is_none());
    assert_eq!(
        store
            .adjacent_edges(&NodeId::new("a"), Direction::Forward)
            .unwrap(),
        vec![EdgeId::new("e2")]
    );
    assert!(store
        .adjacent_edges(&NodeId::new("b"), Direction::Any)
        .unwrap()
        .is_empty());
}

#[test]
fn test_delete_node_leaves_edges_in_place() {
    let mut store = memory_store(JsonCodec);
    store.put_node(&Node::new("a")).unwrap();
    store.put_node(&Node::new("b")).unwrap();
    store.put_edge(&Edge::new("e1", "a", "b")).unwrap();

    store.delete_node(&NodeId::new("a")).unwrap();

    assert!(store.get_node(&NodeId::new("a")).unwrap().is_none());
    assert!(store.get_edge(&EdgeId::new("e1")).unwrap().is_some());
    // The deleted node's id still traverses through its edges
    assert_eq!(
        store.bfs(&NodeId::new("a"), Direction::Any).unwrap(),
        vec![NodeId::new("a"), NodeId::new("b")]
    );
}

#[test]
fn test_self_loop_counted_once() {
    let mut store = memory_store(JsonCodec);
    store.put_edge(&Edge::new("loop", "x", "x")).unwrap();

    let incident = store
        .adjacent_edges(&NodeId::new("x"), Direction::Any)
        .unwrap();
    assert_eq!(incident, vec![EdgeId::new("loop")]);

    assert_eq!(
        store.bfs(&NodeId::new("x"), Direction::Any).unwrap(),
        vec![NodeId::new("x")]
    );
}

#[test]
fn test_adjacency_of_unknown_node_is_empty() {
    let store = memory_store(JsonCodec);
    for direction in [Direction::Forward, Direction::Backward, Direction::Any] {
        assert!(store
            .adjacent_edges(&NodeId::new("missing"), direction)
            .unwrap()
            .is_empty());
    }
}

#[test]
fn test_scan_edges_returns_everything() {
    let mut store = memory_store(JsonCodec);
    store.put_edge(&Edge::new("e2", "a", "b")).unwrap();
    store.put_edge(&Edge::new("e1", "b", "c")).unwrap();
    store.put_edge_unindexed(&Edge::new("e3", "c", "a")).unwrap();

    let edges = store.scan_edges().unwrap();
    let ids: Vec<&str> = edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
}

#[test]
fn test_overwrite_node_replaces_properties() {
    let mut store = memory_store(JsonCodec);
    store
        .put_node(&Node::new_with_properties(
            "n1",
            props(&[("a", PropertyValue::Integer(1))]),
        ))
        .unwrap();
    store
        .put_node(&Node::new_with_properties(
            "n1",
            props(&[("b", PropertyValue::Integer(2))]),
        ))
        .unwrap();

    let node = store.get_node(&NodeId::new("n1")).unwrap().unwrap();
    assert!(node.get_property("a").is_none());
    assert_eq!(node.get_property("b"), Some(&PropertyValue::Integer(2)));
}

#[test]
fn test_parallel_edges_between_same_nodes() {
    let mut store = memory_store(JsonCodec);
    store.put_edge(&Edge::new("e1", "a", "b")).unwrap();
    store.put_edge(&Edge::new("e2", "a", "b")).unwrap();

    let outgoing = store
        .adjacent_edges(&NodeId::new("a"), Direction::Forward)
        .unwrap();
    assert_eq!(outgoing, vec![EdgeId::new("e1"), EdgeId::new("e2")]);

    // Both edges lead to the same neighbor; BFS visits it once
    assert_eq!(
        store.bfs(&NodeId::new("a"), Direction::Any).unwrap(),
        vec![NodeId::new("a"), NodeId::new("b")]
    );
}

#[test]
fn test_put_edge_is_idempotent_in_the_index() {
    let mut store = memory_store(JsonCodec);
    let edge = Edge::new("e1", "a", "b");
    store.put_edge(&edge).unwrap();
    store.put_edge(&edge).unwrap();

    assert_eq!(
        store
            .adjacent_edges(&NodeId::new("a"), Direction::Forward)
            .unwrap(),
        vec![EdgeId::new("e1")]
    );
}

#[test]
fn test_nested_property_values_survive() {
    let mut store = memory_store(BincodeCodec);
    let tags = PropertyValue::Array(vec![
        PropertyValue::String("alpha".to_string()),
        PropertyValue::Integer(7),
    ]);
    store
        .put_node(&Node::new_with_properties(
            "n1",
            props(&[("tags", tags.clone()), ("none", PropertyValue::Null)]),
        ))
        .unwrap();

    let node = store.get_node(&NodeId::new("n1")).unwrap().unwrap();
    assert_eq!(node.get_property("tags"), Some(&tags));
    assert_eq!(node.get_property("none"), Some(&PropertyValue::Null));
}
