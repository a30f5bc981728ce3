//! Common test utilities for building pipeline graphs and payloads.
use pipeflow::prelude::*;

/// A linear `input -> llm -> output` pipeline using canvas-style tags and
/// qualified handle ids.
#[allow(dead_code)]
pub fn create_linear_payload() -> PipelinePayload {
    PipelinePayload::new(
        vec![
            Node::new("input-1", "customInput").at(100.0, 200.0),
            Node::new("llm-1", "llm").at(350.0, 200.0),
            Node::new("output-1", "customOutput").at(600.0, 200.0),
        ],
        vec![
            Edge::new("e1", "input-1", "input-1-value", "llm-1", "llm-1-prompt"),
            Edge::new("e2", "llm-1", "llm-1-response", "output-1", "output-1-value"),
        ],
    )
}

/// The same linear pipeline loaded into a graph.
#[allow(dead_code)]
pub fn create_linear_graph() -> Graph {
    let payload = create_linear_payload();
    let mut graph = Graph::new();
    graph
        .replace_all(payload.nodes, payload.edges)
        .expect("linear pipeline should load");
    graph
}

/// A graph of `count` transform nodes named `t-0 .. t-{count-1}` with no edges.
#[allow(dead_code)]
pub fn create_transform_nodes(count: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..count {
        graph
            .add_node(Node::new(format!("t-{i}"), "transform"))
            .expect("fresh transform node");
    }
    graph
}

/// Connects `t-{from}.output` to `t-{to}.input`.
#[allow(dead_code)]
pub fn chain_edge(id: &str, from: usize, to: usize) -> Edge {
    Edge::new(id, format!("t-{from}"), "output", format!("t-{to}"), "input")
}

/// Raw request body as posted by the canvas, including fields the model ignores.
#[allow(dead_code)]
pub const CANVAS_REQUEST_JSON: &str = r#"{
    "nodes": [
        {"id": "input-1", "type": "customInput", "position": {"x": 100, "y": 200},
         "data": {"id": "input-1", "nodeType": "customInput", "inputName": "user_query"}},
        {"id": "text-1", "type": "text", "position": {"x": 300, "y": 200},
         "data": {"text": "Summarize {{document}} for {{audience}}"}},
        {"id": "output-1", "type": "customOutput", "position": {"x": 500, "y": 200},
         "data": {"outputName": "summary"}}
    ],
    "edges": [
        {"id": "reactflow__edge-1", "source": "input-1", "sourceHandle": "input-1-value",
         "target": "text-1", "targetHandle": "text-1-document",
         "type": "smoothstep", "animated": true, "markerEnd": {"type": "arrow"}},
        {"id": "reactflow__edge-2", "source": "text-1", "sourceHandle": "text-1-output",
         "target": "output-1", "targetHandle": "output-1-value",
         "type": "smoothstep", "animated": true}
    ]
}"#;
