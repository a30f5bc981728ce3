//! The in-memory pipeline graph.
//!
//! A [`Graph`] exclusively owns its nodes and edges. Every mutation either
//! succeeds and leaves the graph consistent (unique ids, every edge bound to
//! existing, correctly directed handles) or fails and leaves it untouched.

use crate::error::{ElementKind, GraphError};
use crate::payload::PipelinePayload;
use crate::registry::NodeRegistry;
use ahash::{AHashMap, RandomState};
use indexmap::IndexMap;
use serde_json::{Map, Value};

mod model;

pub use model::*;

/// How strictly edge handle ids are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlePolicy {
    /// Handle ids must name an existing handle of the right direction.
    #[default]
    Strict,
    /// Only edge endpoints are checked; handle ids are carried but not resolved.
    EndpointsOnly,
}

/// The pipeline graph: insertion-ordered nodes and edges keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    registry: NodeRegistry,
    handle_policy: HandlePolicy,
    nodes: IndexMap<String, Node, RandomState>,
    edges: IndexMap<String, Edge, RandomState>,
}

impl Graph {
    /// Creates an empty graph using the default registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: NodeRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn with_handle_policy(mut self, policy: HandlePolicy) -> Self {
        self.handle_policy = policy;
        self
    }

    /// Builds a graph from a snapshot, rejecting any contract violation.
    pub fn from_payload(
        payload: PipelinePayload,
        registry: NodeRegistry,
        policy: HandlePolicy,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::with_registry(registry).with_handle_policy(policy);
        graph.replace_all(payload.nodes, payload.edges)?;
        Ok(graph)
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node's current handles, re-derived from its current data.
    pub fn handles_of(&self, node_id: &str) -> Result<Vec<HandleSpec>, GraphError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        self.registry.handles_for(node)
    }

    /// Adds a node. Fails on a duplicate id or an unresolvable type tag.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateId {
                kind: ElementKind::Node,
                id: node.id,
            });
        }
        self.registry.resolve(&node.id, &node.node_type)?;
        tracing::debug!(node_id = %node.id, node_type = %node.node_type, "node added");
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Allocates a fresh id of the form `"{tag}-{n}"`.
    pub fn next_node_id(&self, tag: &str) -> String {
        let existing = self.nodes.values().filter(|n| n.node_type == tag).count();
        (existing + 1..)
            .map(|n| format!("{tag}-{n}"))
            .find(|id| !self.nodes.contains_key(id))
            .unwrap_or_else(|| format!("{tag}-{}", self.nodes.len() + 1))
    }

    /// Creates a node of the given type with a fresh id and its default field values.
    pub fn spawn_node(
        &mut self,
        tag: &str,
        position: Option<Position>,
    ) -> Result<String, GraphError> {
        let id = self.next_node_id(tag);
        let data = self.registry.default_data(&id, tag)?;
        self.add_node(Node {
            id: id.clone(),
            node_type: tag.to_string(),
            data,
            position,
        })?;
        Ok(id)
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, node_id: &str) -> Result<(Node, Vec<Edge>), GraphError> {
        let node = self
            .nodes
            .shift_remove(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        let detached: Vec<Edge> = self
            .edges
            .values()
            .filter(|e| e.touches(node_id))
            .cloned()
            .collect();
        self.edges.retain(|_, e| !e.touches(node_id));
        tracing::debug!(node_id, detached = detached.len(), "node removed");
        Ok((node, detached))
    }

    /// Replaces a node's data, re-derives its handles and drops the edges that
    /// were bound to handles which no longer exist. The dropped edges are returned.
    pub fn update_node_data(
        &mut self,
        node_id: &str,
        data: Map<String, Value>,
    ) -> Result<Vec<Edge>, GraphError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        node.data = data;

        if self.handle_policy == HandlePolicy::EndpointsOnly {
            return Ok(Vec::new());
        }

        let mut cache = AHashMap::new();
        let stale: Vec<String> = self
            .edges
            .values()
            .filter(|e| e.touches(node_id))
            .filter(|e| self.check_edge(e, &mut cache).is_err())
            .map(|e| e.id.clone())
            .collect();
        let dropped: Vec<Edge> = stale
            .iter()
            .filter_map(|id| self.edges.shift_remove(id))
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(
                node_id,
                dropped = dropped.len(),
                "edges detached from vanished handles"
            );
        }
        Ok(dropped)
    }

    /// Adds an edge. Fails on a duplicate id or when the edge does not resolve.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateId {
                kind: ElementKind::Edge,
                id: edge.id,
            });
        }
        self.check_edge(&edge, &mut AHashMap::new())?;
        tracing::debug!(
            edge_id = %edge.id,
            source = %edge.source,
            target = %edge.target,
            "edge added"
        );
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> Result<Edge, GraphError> {
        self.edges
            .shift_remove(edge_id)
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))
    }

    /// Atomically swaps in a whole new set of nodes and edges.
    ///
    /// The replacement is assembled and checked on the side; on error the
    /// current graph is left exactly as it was.
    pub fn replace_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<(), GraphError> {
        let mut staging =
            Graph::with_registry(self.registry.clone()).with_handle_policy(self.handle_policy);
        for node in nodes {
            staging.add_node(node)?;
        }

        let mut cache = AHashMap::new();
        for edge in edges {
            if staging.edges.contains_key(&edge.id) {
                return Err(GraphError::DuplicateId {
                    kind: ElementKind::Edge,
                    id: edge.id,
                });
            }
            staging.check_edge(&edge, &mut cache)?;
            staging.edges.insert(edge.id.clone(), edge);
        }

        tracing::info!(
            nodes = staging.node_count(),
            edges = staging.edge_count(),
            "graph replaced"
        );
        self.nodes = staging.nodes;
        self.edges = staging.edges;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Serializable copy of the current nodes and edges.
    pub fn snapshot(&self) -> PipelinePayload {
        PipelinePayload {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    /// Checks that an edge's endpoints exist and, under the strict policy, that
    /// its handle ids resolve to a source handle and a target handle.
    fn check_edge(
        &self,
        edge: &Edge,
        cache: &mut AHashMap<String, Vec<HandleSpec>>,
    ) -> Result<(), GraphError> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::malformed(
                    &edge.id,
                    format!("node '{endpoint}' does not exist"),
                ));
            }
        }
        if self.handle_policy == HandlePolicy::EndpointsOnly {
            return Ok(());
        }

        let ends = [
            (&edge.source, &edge.source_handle, HandleDirection::Source),
            (&edge.target, &edge.target_handle, HandleDirection::Target),
        ];
        for (node_id, reference, direction) in ends {
            if !cache.contains_key(node_id) {
                cache.insert(node_id.clone(), self.handles_of(node_id)?);
            }
            let resolved = cache[node_id]
                .iter()
                .any(|h| h.direction == direction && h.answers_to(reference));
            if !resolved {
                return Err(GraphError::malformed(
                    &edge.id,
                    format!("'{reference}' is not a {direction} handle of node '{node_id}'"),
                ));
            }
        }
        Ok(())
    }
}
