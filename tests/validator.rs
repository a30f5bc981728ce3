//! DAG validation tests
//!
//! Verdicts and counts for hand-built graphs and for received payloads.
//!
mod common;
use common::*;
use pipeflow::prelude::*;

fn summary(num_nodes: usize, num_edges: usize, is_dag: bool) -> ValidationSummary {
    ValidationSummary {
        num_nodes,
        num_edges,
        is_dag,
    }
}

#[test]
fn test_edgeless_graphs_are_dags() {
    assert_eq!(validate(&Graph::new()), summary(0, 0, true));
    assert_eq!(validate(&create_transform_nodes(50)), summary(50, 0, true));
}

#[test]
fn test_self_loop_is_not_a_dag() {
    let mut graph = create_transform_nodes(1);
    graph.add_edge(chain_edge("loop", 0, 0)).unwrap();
    assert!(graph.edge("loop").unwrap().is_self_loop());
    assert_eq!(validate(&graph), summary(1, 1, false));
}

#[test]
fn test_two_node_cycle() {
    let mut graph = create_transform_nodes(2);
    graph.add_edge(chain_edge("ab", 0, 1)).unwrap();
    assert!(validate(&graph).is_dag);

    graph.add_edge(chain_edge("ba", 1, 0)).unwrap();
    assert_eq!(validate(&graph), summary(2, 2, false));
}

#[test]
fn test_closing_and_breaking_a_cycle() {
    let mut graph = create_transform_nodes(4);
    graph.add_edge(chain_edge("e01", 0, 1)).unwrap();
    graph.add_edge(chain_edge("e12", 1, 2)).unwrap();
    graph.add_edge(chain_edge("e23", 2, 3)).unwrap();
    assert!(validate(&graph).is_dag);

    graph.add_edge(chain_edge("e30", 3, 0)).unwrap();
    assert!(!validate(&graph).is_dag, "closing edge should create a cycle");

    graph.remove_edge("e12").unwrap();
    assert_eq!(validate(&graph), summary(4, 3, true));
}

#[test]
fn test_removing_a_node_breaks_its_cycles() {
    let mut graph = create_transform_nodes(3);
    graph.add_edge(chain_edge("e01", 0, 1)).unwrap();
    graph.add_edge(chain_edge("e12", 1, 2)).unwrap();
    graph.add_edge(chain_edge("e20", 2, 0)).unwrap();
    assert!(!validate(&graph).is_dag);

    graph.remove_node("t-1").unwrap();
    assert_eq!(validate(&graph), summary(2, 1, true));
}

#[test]
fn test_verdict_ignores_insertion_order() {
    let arcs = [(0, 1), (1, 2), (2, 3), (3, 1), (0, 4)];
    let mut forward = create_transform_nodes(5);
    for (i, (from, to)) in arcs.iter().enumerate() {
        forward.add_edge(chain_edge(&format!("f{i}"), *from, *to)).unwrap();
    }

    let mut backward = Graph::new();
    for i in (0..5).rev() {
        backward.add_node(Node::new(format!("t-{i}"), "transform")).unwrap();
    }
    for (i, (from, to)) in arcs.iter().enumerate().rev() {
        backward.add_edge(chain_edge(&format!("b{i}"), *from, *to)).unwrap();
    }

    assert_eq!(validate(&forward), validate(&backward));
    assert!(!validate(&forward).is_dag);
}

#[test]
fn test_long_chain_is_validated_iteratively() {
    let count = 20_000;
    let mut graph = create_transform_nodes(count);
    for i in 1..count {
        graph.add_edge(chain_edge(&format!("e{i}"), i - 1, i)).unwrap();
    }
    assert_eq!(validate(&graph), summary(count, count - 1, true));
}

#[test]
fn test_linear_payload_is_a_dag() {
    let result = validate_payload(create_linear_payload(), &ValidationOptions::default());
    assert_eq!(result.unwrap(), summary(3, 2, true));
}

#[test]
fn test_bare_edges_need_lenient_handles() {
    let payload = PipelinePayload::from_json(
        r#"{
            "nodes": [
                {"id": "input-1", "type": "customInput", "data": {}},
                {"id": "output-1", "type": "customOutput", "data": {}}
            ],
            "edges": [
                {"id": "e1", "source": "input-1", "target": "output-1"},
                {"id": "e2", "source": "output-1", "target": "input-1",
                 "sourceHandle": null, "targetHandle": null}
            ]
        }"#,
    )
    .unwrap();

    let strict = validate_payload(payload.clone(), &ValidationOptions::default());
    assert!(matches!(strict, Err(GraphError::MalformedEdge { .. })));

    let options = ValidationOptions {
        handle_policy: HandlePolicy::EndpointsOnly,
        ..ValidationOptions::default()
    };
    assert_eq!(validate_payload(payload, &options).unwrap(), summary(2, 2, false));
}

#[test]
fn test_contract_violations_are_errors_not_verdicts() {
    let options = ValidationOptions::default();

    let unknown = PipelinePayload::new(vec![Node::new("n-1", "mystery")], vec![]);
    assert!(matches!(
        validate_payload(unknown, &options),
        Err(GraphError::UnknownNodeType { .. })
    ));

    let duplicate_edge = PipelinePayload::new(
        vec![Node::new("t-0", "transform"), Node::new("t-1", "transform")],
        vec![chain_edge("e", 0, 1), chain_edge("e", 1, 0)],
    );
    let err = validate_payload(duplicate_edge, &options).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate edge id 'e'");

    let dangling = PipelinePayload::new(
        vec![Node::new("t-0", "transform")],
        vec![chain_edge("e", 0, 7)],
    );
    assert!(matches!(
        validate_payload(dangling, &options),
        Err(GraphError::MalformedEdge { .. })
    ));
}

#[test]
fn test_passthrough_unknown_types() {
    let payload = PipelinePayload::new(
        vec![Node::new("a", "vision"), Node::new("b", "transform")],
        vec![
            Edge::new("e1", "a", "output", "b", "input"),
            Edge::new("e2", "b", "output", "a", "input"),
        ],
    );
    let options = ValidationOptions {
        unknown_types: UnknownTypePolicy::Passthrough,
        ..ValidationOptions::default()
    };
    assert_eq!(validate_payload(payload, &options).unwrap(), summary(2, 2, false));
}
