//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the pipeflow
//! crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use pipeflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let payload = PipelinePayload::from_file("path/to/pipeline.json")?;
//! let summary = validate_payload(payload, &ValidationOptions::default())?;
//! println!("Validation Result: {}", summary);
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{Edge, Graph, HandleDirection, HandlePolicy, HandleSpec, Node, Position};

// Node types and templates
pub use crate::registry::{NodeRegistry, NodeType, UnknownTypePolicy};
pub use crate::template::extract_variables;

// Validation
pub use crate::payload::{PipelinePayload, ValidationSummary};
pub use crate::validator::{ValidationOptions, validate, validate_payload};
pub use crate::transport::{LocalTransport, ValidationTransport};

// Error types
pub use crate::error::{GraphError, PayloadError, TransportError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
