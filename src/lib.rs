//! # Pipeflow - Pipeline Graph Model and DAG Validation
//!
//! **Pipeflow** is the model behind a visual pipeline editor: typed nodes with named
//! input and output handles, directed edges between those handles, and a validator that
//! decides whether the resulting graph is acyclic. The validator is stateless and can run
//! in-process or behind an HTTP boundary.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Graph**: Add nodes by type tag (`"llm"`, `"text"`, `"customInput"`, ...).
//!     The [`registry::NodeRegistry`] derives each node's handles, including the
//!     template variables of text nodes.
//! 2.  **Connect Handles**: Add edges from a source handle to a target handle. Edges that
//!     do not resolve are rejected and the graph stays unchanged.
//! 3.  **Validate**: Call [`validator::validate`] on the graph, or send a
//!     [`payload::PipelinePayload`] snapshot through a [`transport::ValidationTransport`].
//!
//! ## Quick Start
//!
//! ```rust
//! use pipeflow::prelude::*;
//!
//! fn main() -> std::result::Result<(), GraphError> {
//!     let mut graph = Graph::new();
//!     graph.add_node(Node::new("input-1", "customInput"))?;
//!     graph.add_node(Node::new("text-1", "text").with_data("text", "Hello {{name}}"))?;
//!     graph.add_node(Node::new("output-1", "customOutput"))?;
//!
//!     // Text nodes grow one input handle per template variable.
//!     graph.add_edge(Edge::new("e1", "input-1", "value", "text-1", "name"))?;
//!     graph.add_edge(Edge::new("e2", "text-1", "output", "output-1", "value"))?;
//!
//!     let summary = validate(&graph);
//!     assert_eq!(summary.num_nodes, 3);
//!     assert_eq!(summary.num_edges, 2);
//!     assert!(summary.is_dag);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gallery;
pub mod graph;
pub mod payload;
pub mod prelude;
pub mod registry;
pub mod template;
pub mod transport;
pub mod validator;

#[cfg(feature = "server")]
pub mod server;
