//! Graph model tests
//!
//! Mutation semantics of the pipeline graph and handle derivation per node type.
//!
mod common;
use common::*;
use pipeflow::prelude::*;
use serde_json::{Map, Value, json};

fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn target_ids(graph: &Graph, node_id: &str) -> Vec<String> {
    graph
        .handles_of(node_id)
        .unwrap()
        .into_iter()
        .filter(|h| h.direction == HandleDirection::Target)
        .map(|h| h.id)
        .collect()
}

#[test]
fn test_static_handle_tables() {
    let mut graph = Graph::new();
    for node_type in NodeType::ALL {
        graph
            .add_node(Node::new(format!("{}-1", node_type.tag()), node_type.tag()))
            .unwrap();
    }

    let expect = |id: &str, targets: &[&str], sources: &[&str]| {
        let handles = graph.handles_of(id).unwrap();
        let of = |direction: HandleDirection| {
            handles
                .iter()
                .filter(|h| h.direction == direction)
                .map(|h| h.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(of(HandleDirection::Target), targets, "targets of {id}");
        assert_eq!(of(HandleDirection::Source), sources, "sources of {id}");
    };

    expect("input-1", &[], &["value"]);
    expect("output-1", &["value"], &[]);
    expect("text-1", &["input"], &["output"]);
    expect("llm-1", &["system", "prompt"], &["response"]);
    expect("math-1", &["a", "b"], &["result"]);
    expect("filter-1", &["input"], &["passed", "failed"]);
    expect("transform-1", &["input"], &["output"]);
    expect("delay-1", &["input"], &["output"]);
    expect("api-1", &["body", "params"], &["response", "error"]);
}

#[test]
fn test_text_node_handles_follow_template_edits() {
    let mut graph = Graph::new();
    graph
        .add_node(Node::new("text-1", "text").with_data("text", "Hello {{name}}, you are {{age}}"))
        .unwrap();
    graph.add_node(Node::new("input-1", "input")).unwrap();
    graph.add_node(Node::new("input-2", "input")).unwrap();
    assert_eq!(target_ids(&graph, "text-1"), vec!["name", "age"]);

    graph
        .add_edge(Edge::new("e1", "input-1", "value", "text-1", "name"))
        .unwrap();
    graph
        .add_edge(Edge::new("e2", "input-2", "value", "text-1", "text-1-age"))
        .unwrap();

    let dropped = graph
        .update_node_data("text-1", data(&[("text", json!("Hello {{name}}"))]))
        .unwrap();
    assert_eq!(target_ids(&graph, "text-1"), vec!["name"]);
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].id, "e2");
    assert!(graph.edge("e1").is_some());
    assert!(graph.edge("e2").is_none());
}

#[test]
fn test_edge_to_vanished_handle_in_snapshot_is_malformed() {
    let mut graph = Graph::new();
    graph
        .add_node(Node::new("text-1", "text").with_data("text", "Hello {{name}}, you are {{age}}"))
        .unwrap();
    graph.add_node(Node::new("input-1", "input")).unwrap();
    graph
        .add_edge(Edge::new("e1", "input-1", "value", "text-1", "age"))
        .unwrap();

    let mut payload = graph.snapshot();
    payload.nodes[0] = Node::new("text-1", "text").with_data("text", "Hello {{name}}");

    let err = validate_payload(payload, &ValidationOptions::default()).unwrap_err();
    assert!(
        matches!(err, GraphError::MalformedEdge { ref edge_id, .. } if edge_id == "e1"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_snapshot_preserves_insertion_order() {
    let graph = create_linear_graph();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);

    let snapshot = graph.snapshot();
    let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["input-1", "llm-1", "output-1"]);
    assert_eq!(snapshot, create_linear_payload());
}

#[test]
fn test_failed_mutations_leave_graph_unchanged() {
    let mut graph = create_linear_graph();
    let before = graph.snapshot();

    assert!(graph.add_node(Node::new("x-1", "mystery")).is_err());
    assert!(
        graph
            .add_edge(Edge::new("e3", "llm-1", "response", "input-1", "value"))
            .is_err(),
        "input nodes expose no target handle"
    );
    assert!(matches!(
        graph.remove_edge("nope"),
        Err(GraphError::EdgeNotFound(_))
    ));
    assert!(matches!(
        graph.update_node_data("nope", Map::new()),
        Err(GraphError::NodeNotFound(_))
    ));
    assert_eq!(graph.snapshot(), before);
}

#[test]
fn test_replace_all_and_clear() {
    let mut graph = create_transform_nodes(3);
    graph.add_edge(chain_edge("a", 0, 1)).unwrap();

    let linear = create_linear_payload();
    graph.replace_all(linear.nodes, linear.edges).unwrap();
    assert!(graph.node("t-0").is_none());
    assert_eq!(graph.node_count(), 3);

    let duplicate = graph.replace_all(
        vec![Node::new("n", "delay"), Node::new("n", "delay")],
        vec![],
    );
    assert!(matches!(duplicate, Err(GraphError::DuplicateId { .. })));
    assert_eq!(graph.node_count(), 3);

    graph.clear();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_spawned_nodes_get_field_defaults() {
    let mut graph = Graph::new();
    let first = graph
        .spawn_node("customOutput", Some(Position { x: 1.0, y: 2.0 }))
        .unwrap();
    let second = graph.spawn_node("customOutput", None).unwrap();
    assert_eq!(first, "customOutput-1");
    assert_eq!(second, "customOutput-2");
    assert_eq!(graph.node(&second).unwrap().data["outputName"], "output_2");

    let math = graph.spawn_node("math", None).unwrap();
    assert_eq!(graph.node(&math).unwrap().data["operation"], "add");

    assert!(matches!(
        graph.spawn_node("mystery", None),
        Err(GraphError::UnknownNodeType { .. })
    ));
}

#[test]
fn test_canvas_request_is_accepted() {
    let payload = PipelinePayload::from_json(CANVAS_REQUEST_JSON).unwrap();
    assert_eq!(payload.edges[0].source_handle, "input-1-value");

    let graph = Graph::from_payload(payload, NodeRegistry::new(), HandlePolicy::Strict).unwrap();
    assert_eq!(target_ids(&graph, "text-1"), vec!["document", "audience"]);
}
