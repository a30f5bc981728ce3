//! The validation request/response contract.

use crate::error::PayloadError;
use crate::graph::{Edge, Node};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

/// Route of the validation endpoint, relative to the validator's base URL.
pub const PARSE_ROUTE: &str = "/pipelines/parse";

/// A serialized graph snapshot, as sent to a validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelinePayload {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl PipelinePayload {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a pipeline from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, PayloadError> {
        let content = fs::read_to_string(path).map_err(|source| PayloadError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The validation verdict for a graph snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_dag: bool,
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} edges, {}",
            self.num_nodes,
            self.num_edges,
            if self.is_dag {
                "valid DAG"
            } else {
                "contains a cycle"
            }
        )
    }
}
