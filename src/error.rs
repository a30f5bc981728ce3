use thiserror::Error;

/// Which kind of graph element an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Edge,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Edge => write!(f, "edge"),
        }
    }
}

/// Structural violations detected while building, mutating or validating a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{node_id}' has an unregistered node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Edge '{edge_id}' is malformed: {reason}")]
    MalformedEdge { edge_id: String, reason: String },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: ElementKind, id: String },

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(String),
}

impl GraphError {
    pub(crate) fn malformed(edge_id: &str, reason: impl Into<String>) -> Self {
        GraphError::MalformedEdge {
            edge_id: edge_id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised when a pipeline document cannot be decoded.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Failed to parse pipeline JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read pipeline file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a validation transport.
///
/// None of these carry a cycle verdict: an unreachable validator is a distinct
/// condition from a graph that is provably cyclic.
#[derive(Error, Debug)]
pub enum TransportError {
    #[cfg(feature = "client")]
    #[error("Validation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Validator responded with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Malformed validator response: {0}")]
    Decode(String),

    #[error("Validator rejected the pipeline: {0}")]
    Rejected(#[from] GraphError),
}
