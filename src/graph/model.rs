use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Canvas coordinates of a node. Carried through untouched; the model never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A typed processing unit in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// The node-type tag, resolved against a `NodeRegistry`.
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            data: Map::new(),
            position: None,
        }
    }

    pub fn with_data(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.data.insert(field.to_string(), value.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }
}

/// A directed connection from one node's source handle to another node's target handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    #[serde(
        rename = "sourceHandle",
        alias = "source_handle",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub source_handle: String,
    pub target: String,
    #[serde(
        rename = "targetHandle",
        alias = "target_handle",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub target_handle: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// Front-ends send `null` for handles they did not record.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whether a handle emits (source) or receives (target) a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleDirection {
    Source,
    Target,
}

impl fmt::Display for HandleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleDirection::Source => f.pad("source"),
            HandleDirection::Target => f.pad("target"),
        }
    }
}

/// One connection point on a concrete node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleSpec {
    /// Unique within the owning node.
    pub id: String,
    pub direction: HandleDirection,
    pub owner_node_id: String,
}

impl HandleSpec {
    pub fn new(id: impl Into<String>, direction: HandleDirection, owner: &str) -> Self {
        Self {
            id: id.into(),
            direction,
            owner_node_id: owner.to_string(),
        }
    }

    /// The canvas form of the handle id: `"{owner}-{id}"`.
    pub fn qualified_id(&self) -> String {
        format!("{}-{}", self.owner_node_id, self.id)
    }

    /// Returns true if `reference` names this handle, either by its local id
    /// or by its qualified id.
    pub fn answers_to(&self, reference: &str) -> bool {
        reference == self.id
            || reference
                .strip_prefix(self.owner_node_id.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .is_some_and(|local| local == self.id)
    }
}
