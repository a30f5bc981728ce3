//! A fixed catalog of named example pipelines.
//!
//! Loading an example is a plain `Graph::replace_all` with its nodes and edges.

use crate::error::GraphError;
use crate::graph::{Edge, Graph, Node};
use crate::payload::PipelinePayload;
use serde::Serialize;
use serde_json::{Value, json};

/// Whether an example is expected to validate as a DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Validity {
    Valid,
    Invalid,
}

/// A named, pre-built pipeline.
#[derive(Debug, Clone)]
pub struct Example {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub validity: Validity,
    pub pipeline: PipelinePayload,
}

impl Example {
    /// Replaces the whole graph with this example.
    pub fn load_into(&self, graph: &mut Graph) -> Result<(), GraphError> {
        tracing::debug!(example = self.id, "loading example pipeline");
        graph.replace_all(self.pipeline.nodes.clone(), self.pipeline.edges.clone())
    }
}

fn node(id: &str, tag: &str, x: f64, y: f64, fields: &[(&str, Value)]) -> Node {
    fields
        .iter()
        .fold(Node::new(id, tag).at(x, y), |node, (field, value)| {
            node.with_data(field, value.clone())
        })
}

/// An edge using the canvas' qualified handle ids.
fn edge(
    id: &str,
    (source, source_handle): (&str, &str),
    (target, target_handle): (&str, &str),
) -> Edge {
    Edge::new(
        id,
        source,
        format!("{source}-{source_handle}"),
        target,
        format!("{target}-{target_handle}"),
    )
}

fn input(id: &str, x: f64, y: f64, name: &str) -> Node {
    node(
        id,
        "customInput",
        x,
        y,
        &[("inputName", json!(name)), ("inputType", json!("Text"))],
    )
}

fn output(id: &str, x: f64, y: f64, name: &str) -> Node {
    node(
        id,
        "customOutput",
        x,
        y,
        &[("outputName", json!(name)), ("outputType", json!("Text"))],
    )
}

fn example(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    validity: Validity,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
) -> Example {
    Example {
        id,
        name,
        description,
        validity,
        pipeline: PipelinePayload::new(nodes, edges),
    }
}

/// Returns every example, valid ones first.
pub fn catalog() -> Vec<Example> {
    vec![
        example(
            "simple-linear",
            "Simple Linear Pipeline",
            "Basic Input → LLM → Output flow",
            Validity::Valid,
            vec![
                input("input-1", 100.0, 200.0, "user_query"),
                node("llm-1", "llm", 350.0, 200.0, &[]),
                output("output-1", 600.0, 200.0, "response"),
            ],
            vec![
                edge("e1", ("input-1", "value"), ("llm-1", "prompt")),
                edge("e2", ("llm-1", "response"), ("output-1", "value")),
            ],
        ),
        example(
            "text-processing",
            "Text Processing Pipeline",
            "Input → Text Template → Transform → Output",
            Validity::Valid,
            vec![
                input("input-1", 50.0, 200.0, "raw_data"),
                node(
                    "text-1",
                    "text",
                    250.0,
                    200.0,
                    &[("text", json!("Processing: {{input_data}}"))],
                ),
                node(
                    "transform-1",
                    "transform",
                    450.0,
                    200.0,
                    &[("transformation", json!("uppercase"))],
                ),
                output("output-1", 650.0, 200.0, "processed_text"),
            ],
            vec![
                edge("e1", ("input-1", "value"), ("text-1", "input_data")),
                edge("e2", ("text-1", "output"), ("transform-1", "input")),
                edge("e3", ("transform-1", "output"), ("output-1", "value")),
            ],
        ),
        example(
            "branching-pipeline",
            "Branching Pipeline",
            "Input splits to Math and Filter, then converges to Output",
            Validity::Valid,
            vec![
                input("input-1", 50.0, 250.0, "numbers"),
                node("math-1", "math", 250.0, 150.0, &[("operation", json!("multiply"))]),
                node(
                    "filter-1",
                    "filter",
                    250.0,
                    350.0,
                    &[("condition", json!("contains")), ("value", json!("positive"))],
                ),
                output("output-1", 500.0, 250.0, "result"),
            ],
            vec![
                edge("e1", ("input-1", "value"), ("math-1", "a")),
                edge("e2", ("input-1", "value"), ("filter-1", "input")),
                edge("e3", ("math-1", "result"), ("output-1", "value")),
                edge("e4", ("filter-1", "passed"), ("output-1", "value")),
            ],
        ),
        example(
            "complex-valid",
            "Complex Valid DAG",
            "Multi-path processing with API integration",
            Validity::Valid,
            vec![
                input("input-1", 50.0, 200.0, "user_request"),
                node("text-1", "text", 200.0, 100.0, &[("text", json!("Query: {{request}}"))]),
                node(
                    "api-1",
                    "api",
                    200.0,
                    300.0,
                    &[
                        ("method", json!("POST")),
                        ("url", json!("https://api.example.com/process")),
                    ],
                ),
                node(
                    "delay-1",
                    "delay",
                    400.0,
                    100.0,
                    &[("duration", json!(1000)), ("unit", json!("ms"))],
                ),
                node("llm-1", "llm", 400.0, 300.0, &[]),
                output("output-1", 600.0, 200.0, "final_result"),
            ],
            vec![
                edge("e1", ("input-1", "value"), ("text-1", "request")),
                edge("e2", ("input-1", "value"), ("api-1", "body")),
                edge("e3", ("text-1", "output"), ("delay-1", "input")),
                edge("e4", ("api-1", "response"), ("llm-1", "prompt")),
                edge("e5", ("delay-1", "output"), ("output-1", "value")),
                edge("e6", ("llm-1", "response"), ("output-1", "value")),
            ],
        ),
        example(
            "simple-cycle",
            "Simple Cycle",
            "Transform → Filter → Transform (creates a cycle)",
            Validity::Invalid,
            vec![
                node(
                    "transform-1",
                    "transform",
                    200.0,
                    150.0,
                    &[("transformation", json!("uppercase"))],
                ),
                node(
                    "filter-1",
                    "filter",
                    400.0,
                    150.0,
                    &[("condition", json!("contains")), ("value", json!("retry"))],
                ),
            ],
            vec![
                edge("e1", ("transform-1", "output"), ("filter-1", "input")),
                edge("e2", ("filter-1", "failed"), ("transform-1", "input")),
            ],
        ),
        example(
            "self-loop",
            "Self Loop",
            "Math node connects to itself",
            Validity::Invalid,
            vec![node("math-1", "math", 300.0, 200.0, &[("operation", json!("add"))])],
            vec![edge("e1", ("math-1", "result"), ("math-1", "a"))],
        ),
        example(
            "complex-cycle",
            "Complex Cycle",
            "Math → Filter → Transform → Math (creates a cycle)",
            Validity::Invalid,
            vec![
                input("input-1", 50.0, 200.0, "data"),
                node("math-1", "math", 200.0, 200.0, &[("operation", json!("multiply"))]),
                node(
                    "filter-1",
                    "filter",
                    350.0,
                    200.0,
                    &[("condition", json!("contains")), ("value", json!("test"))],
                ),
                node(
                    "transform-1",
                    "transform",
                    500.0,
                    200.0,
                    &[("transformation", json!("uppercase"))],
                ),
                output("output-1", 650.0, 200.0, "result"),
            ],
            vec![
                edge("e1", ("input-1", "value"), ("math-1", "a")),
                edge("e2", ("math-1", "result"), ("filter-1", "input")),
                edge("e3", ("filter-1", "passed"), ("transform-1", "input")),
                edge("e4", ("transform-1", "output"), ("math-1", "b")),
                edge("e5", ("transform-1", "output"), ("output-1", "value")),
            ],
        ),
        example(
            "multiple-cycles",
            "Multiple Cycles",
            "Two separate cycles in the same pipeline",
            Validity::Invalid,
            vec![
                input("input-1", 100.0, 100.0, "data1"),
                node("math-1", "math", 300.0, 100.0, &[("operation", json!("add"))]),
                node(
                    "delay-1",
                    "delay",
                    500.0,
                    100.0,
                    &[("duration", json!(500)), ("unit", json!("ms"))],
                ),
                node(
                    "filter-1",
                    "filter",
                    100.0,
                    300.0,
                    &[("condition", json!("equals")), ("value", json!("test"))],
                ),
                node(
                    "transform-1",
                    "transform",
                    300.0,
                    300.0,
                    &[("transformation", json!("lowercase"))],
                ),
            ],
            vec![
                edge("e1", ("input-1", "value"), ("math-1", "a")),
                edge("e2", ("math-1", "result"), ("delay-1", "input")),
                edge("e3", ("delay-1", "output"), ("math-1", "b")),
                edge("e4", ("filter-1", "passed"), ("transform-1", "input")),
                edge("e5", ("transform-1", "output"), ("filter-1", "input")),
            ],
        ),
    ]
}

/// Looks up an example by id.
pub fn find(id: &str) -> Option<Example> {
    catalog().into_iter().find(|example| example.id == id)
}
