//! The node type registry.
//!
//! Maps node-type tags to their declared field and handle schema, and derives the
//! concrete handle set of a node. Tags the registry does not know are handled
//! according to an explicit [`UnknownTypePolicy`]; nothing is silently coerced.

use crate::error::GraphError;
use crate::graph::{HandleDirection, HandleSpec, Node};
use crate::template::extract_variables;
use ahash::AHashMap;
use serde_json::{Map, Value};

mod schema;

pub use schema::*;

/// What to do with a node whose type tag is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTypePolicy {
    /// Fail with `GraphError::UnknownNodeType`.
    #[default]
    Reject,
    /// Treat the node as a bare passthrough with one `input` and one `output` handle.
    Passthrough,
}

/// The result of resolving a tag against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType {
    Builtin(NodeType),
    Passthrough,
}

impl ResolvedType {
    pub fn title(&self) -> &'static str {
        match self {
            ResolvedType::Builtin(node_type) => node_type.title(),
            ResolvedType::Passthrough => "Passthrough",
        }
    }

    pub fn schema(&self) -> NodeSchema {
        match self {
            ResolvedType::Builtin(node_type) => schema_for(*node_type),
            ResolvedType::Passthrough => passthrough_schema(),
        }
    }
}

/// Catalog of node types, user tag aliases and the unknown-type policy.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    aliases: AHashMap<String, NodeType>,
    unknown_policy: UnknownTypePolicy,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        let mut aliases = AHashMap::new();
        // Tags emitted by the canvas palette.
        aliases.insert("customInput".to_string(), NodeType::Input);
        aliases.insert("customOutput".to_string(), NodeType::Output);
        Self {
            aliases,
            unknown_policy: UnknownTypePolicy::default(),
        }
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a user-facing tag onto a built-in type. Unknown built-in tags are ignored.
    pub fn with_alias(mut self, user_tag: &str, builtin_tag: &str) -> Self {
        if let Some(node_type) = NodeType::from_tag(builtin_tag) {
            self.aliases.insert(user_tag.to_string(), node_type);
        }
        self
    }

    pub fn with_unknown_policy(mut self, policy: UnknownTypePolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    /// Resolves a tag to a built-in type, or to a passthrough when the policy allows it.
    pub fn resolve(&self, node_id: &str, tag: &str) -> Result<ResolvedType, GraphError> {
        let builtin = NodeType::from_tag(tag).or_else(|| self.aliases.get(tag).copied());
        if let Some(node_type) = builtin {
            return Ok(ResolvedType::Builtin(node_type));
        }
        match self.unknown_policy {
            UnknownTypePolicy::Passthrough => {
                tracing::debug!(node_id, tag, "treating unknown node type as passthrough");
                Ok(ResolvedType::Passthrough)
            }
            UnknownTypePolicy::Reject => Err(GraphError::UnknownNodeType {
                node_id: node_id.to_string(),
                type_name: tag.to_string(),
            }),
        }
    }

    /// Returns the declared schema for a node's tag.
    pub fn schema_of(&self, node: &Node) -> Result<NodeSchema, GraphError> {
        Ok(self.resolve(&node.id, &node.node_type)?.schema())
    }

    /// Derives the concrete, ordered handle set of a node.
    ///
    /// Targets come first, then sources. Template-driven nodes get one target per
    /// distinct variable of their current template, in first-seen order. A variable
    /// whose name collides with a declared handle is left out, so handle ids stay
    /// unique within the node.
    pub fn handles_for(&self, node: &Node) -> Result<Vec<HandleSpec>, GraphError> {
        let schema = self.schema_of(node)?;
        let mut handles: Vec<HandleSpec> = schema
            .targets()
            .map(|h| HandleSpec::new(h.name, HandleDirection::Target, &node.id))
            .collect();

        if schema.derives_variables {
            for variable in extract_variables(template_of(node)) {
                if schema.handles.iter().any(|h| h.name == variable) {
                    tracing::warn!(
                        node_id = %node.id,
                        variable = %variable,
                        "template variable shadows a declared handle and gets no input"
                    );
                    continue;
                }
                handles.push(HandleSpec::new(variable, HandleDirection::Target, &node.id));
            }
        }

        handles.extend(
            schema
                .sources()
                .map(|h| HandleSpec::new(h.name, HandleDirection::Source, &node.id)),
        );
        Ok(handles)
    }

    /// Builds the initial data of a freshly created node from its field defaults.
    pub fn default_data(&self, node_id: &str, tag: &str) -> Result<Map<String, Value>, GraphError> {
        let schema = self.resolve(node_id, tag)?.schema();
        Ok(schema
            .fields
            .iter()
            .map(|field| (field.name.to_string(), field.default.value_for(node_id)))
            .collect())
    }
}

/// The template of a text node; empty or missing templates fall back to the default.
fn template_of(node: &Node) -> &str {
    match node.data.get(TEMPLATE_FIELD).and_then(Value::as_str) {
        Some(text) if !text.is_empty() => text,
        _ => DEFAULT_TEMPLATE,
    }
}
