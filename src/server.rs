//! HTTP validation service.
//!
//! Stateless: every request is validated on its own and nothing is retained
//! between calls.

use crate::error::GraphError;
use crate::payload::{PARSE_ROUTE, PipelinePayload, ValidationSummary};
use crate::validator::{ValidationOptions, validate_payload};
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Settings of the validation service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to call the service from a browser.
    pub allowed_origins: Vec<String>,
    pub options: ValidationOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            options: ValidationOptions::default(),
        }
    }
}

impl ServerConfig {
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// A contract violation, reported as `422 {"detail": ...}`.
struct Rejection(GraphError);

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": format!("Error parsing pipeline: {}", self.0) }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}

async fn ping() -> Json<Value> {
    Json(json!({ "Ping": "Pong" }))
}

async fn parse_pipeline(
    State(options): State<ValidationOptions>,
    Json(payload): Json<PipelinePayload>,
) -> Result<Json<ValidationSummary>, Rejection> {
    validate_payload(payload, &options).map(Json).map_err(Rejection)
}

/// Builds the service router.
pub fn router(config: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(
                    target: "server::startup",
                    origin = %origin,
                    "ignoring invalid CORS origin"
                );
                None
            }
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(ping))
        .route(PARSE_ROUTE, post(parse_pipeline))
        .with_state(config.options)
        .layer(cors)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> io::Result<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        target: "server::startup",
        addr = %addr,
        handle_policy = ?config.options.handle_policy,
        unknown_types = ?config.options.unknown_types,
        "Validation service is listening"
    );

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|err| {
            tracing::error!(target: "server::shutdown", error = %err, "Server encountered an error")
        })?;

    tracing::info!(target: "server::shutdown", "Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(
            target: "server::shutdown",
            error = %err,
            "Failed to listen for shutdown signal"
        );
    }
}
