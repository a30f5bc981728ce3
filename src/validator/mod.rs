//! DAG validation of pipeline graphs.
//!
//! Validation is a pure read: it never mutates the graph it inspects and keeps
//! no state between calls, so it can run locally or behind a network boundary.

use crate::error::GraphError;
use crate::graph::{Graph, HandlePolicy};
use crate::payload::{PipelinePayload, ValidationSummary};
use crate::registry::{NodeRegistry, UnknownTypePolicy};

mod cycle;

use cycle::ArcGraph;

/// How strictly a received snapshot is checked before the cycle verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub handle_policy: HandlePolicy,
    pub unknown_types: UnknownTypePolicy,
}

impl ValidationOptions {
    pub fn lenient() -> Self {
        Self {
            handle_policy: HandlePolicy::EndpointsOnly,
            unknown_types: UnknownTypePolicy::Passthrough,
        }
    }

    pub fn registry(&self) -> NodeRegistry {
        NodeRegistry::new().with_unknown_policy(self.unknown_types)
    }
}

/// Counts the nodes and edges of a graph and decides whether it is acyclic.
///
/// Edges are projected to node-to-node arcs; parallel edges still count once
/// each in `num_edges`, but form a single arc for cycle detection.
pub fn validate(graph: &Graph) -> ValidationSummary {
    let arcs = ArcGraph::build(
        graph.nodes().map(|n| n.id.as_str()),
        graph.edges().map(|e| (e.source.as_str(), e.target.as_str())),
    );
    tracing::trace!(arcs = arcs.arc_count(), "projected node-to-node arcs");
    let back_arc = arcs.find_back_arc();
    if let Some((from, to)) = back_arc {
        tracing::debug!(from, to, "cycle detected");
    }

    let summary = ValidationSummary {
        num_nodes: graph.node_count(),
        num_edges: graph.edge_count(),
        is_dag: back_arc.is_none(),
    };
    tracing::info!(
        num_nodes = summary.num_nodes,
        num_edges = summary.num_edges,
        is_dag = summary.is_dag,
        "pipeline validated"
    );
    summary
}

/// Validates a snapshot received from outside the graph model.
///
/// The snapshot is checked against the data contract first (unique ids, edges
/// resolving to existing nodes and handles, known node types); a violation is
/// returned as an error and never folded into the cycle verdict.
pub fn validate_payload(
    payload: PipelinePayload,
    options: &ValidationOptions,
) -> Result<ValidationSummary, GraphError> {
    let graph = Graph::from_payload(payload, options.registry(), options.handle_policy)
        .inspect_err(|err| tracing::warn!(error = %err, "pipeline rejected"))?;
    Ok(validate(&graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    #[test]
    fn test_payload_with_dangling_endpoint_is_rejected() {
        let payload = PipelinePayload::new(
            vec![Node::new("a", "transform")],
            vec![Edge::new("e1", "a", "output", "b", "input")],
        );
        let err = validate_payload(payload, &ValidationOptions::default()).unwrap_err();
        assert!(matches!(err, GraphError::MalformedEdge { ref edge_id, .. } if edge_id == "e1"));
    }

    #[test]
    fn test_lenient_options_accept_unknown_types_and_bare_edges() {
        let payload = PipelinePayload::new(
            vec![Node::new("a", "mystery"), Node::new("b", "mystery")],
            vec![Edge::new("e1", "a", "", "b", ""), Edge::new("e2", "b", "", "a", "")],
        );
        assert!(validate_payload(payload.clone(), &ValidationOptions::default()).is_err());

        let summary = validate_payload(payload, &ValidationOptions::lenient()).unwrap();
        assert_eq!(
            summary,
            ValidationSummary {
                num_nodes: 2,
                num_edges: 2,
                is_dag: false
            }
        );
    }

    #[test]
    fn test_parallel_edges_count_but_collapse() {
        let mut graph = Graph::new();
        graph.add_node(Node::new("api-1", "api")).unwrap();
        graph.add_node(Node::new("llm-1", "llm")).unwrap();
        graph
            .add_edge(Edge::new("e1", "api-1", "response", "llm-1", "prompt"))
            .unwrap();
        graph
            .add_edge(Edge::new("e2", "api-1", "error", "llm-1", "system"))
            .unwrap();
        let summary = validate(&graph);
        assert_eq!(summary.num_edges, 2);
        assert!(summary.is_dag);
    }
}
