//! Transports that carry a graph snapshot to a validator and bring back its verdict.
//!
//! A transport failure is always an `Err`; it is never reported as a cyclic graph.

use crate::error::TransportError;
use crate::payload::{PipelinePayload, ValidationSummary};
use crate::validator::{ValidationOptions, validate_payload};
use async_trait::async_trait;

#[cfg(feature = "client")]
mod http;

#[cfg(feature = "client")]
pub use http::{HttpTransport, HttpTransportConfig};

/// A single request/response exchange with a validator.
///
/// Dropping the returned future cancels the call; nothing is retried.
#[async_trait]
pub trait ValidationTransport: Send + Sync {
    async fn validate(
        &self,
        payload: &PipelinePayload,
    ) -> Result<ValidationSummary, TransportError>;
}

/// Validates in-process with the local validator.
#[derive(Debug, Clone, Default)]
pub struct LocalTransport {
    options: ValidationOptions,
}

impl LocalTransport {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ValidationTransport for LocalTransport {
    async fn validate(
        &self,
        payload: &PipelinePayload,
    ) -> Result<ValidationSummary, TransportError> {
        Ok(validate_payload(payload.clone(), &self.options)?)
    }
}
