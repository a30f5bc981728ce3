use super::ValidationTransport;
use crate::error::TransportError;
use crate::payload::{PARSE_ROUTE, PipelinePayload, ValidationSummary};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for a remote validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpTransportConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Error body returned by the validator on a rejected request.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Sends snapshots to a remote validator with `POST {base_url}/pipelines/parse`.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &HttpTransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), PARSE_ROUTE),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ValidationTransport for HttpTransport {
    async fn validate(
        &self,
        payload: &PipelinePayload,
    ) -> Result<ValidationSummary, TransportError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            nodes = payload.nodes.len(),
            edges = payload.edges.len(),
            "sending pipeline to remote validator"
        );

        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| e.to_string());
            let detail = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody {
                    detail: serde_json::Value::String(message),
                }) => message,
                Ok(ErrorBody { detail }) => detail.to_string(),
                Err(_) => body,
            };
            tracing::error!(status = %status, detail = %detail, "remote validator error");
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
