//! HTTP transport for the MCP server.
//!
//! Provides a JSON-RPC over HTTP endpoint that reuses the same dispatch as
//! the stdio transport. Routes:
//! - `GET /health`: liveness and session status
//! - `POST /`: JSON-RPC MCP handler

use crate::protocol::{INTERNAL_ERROR, JsonRpcRequest, JsonRpcResponse};
use crate::server::{RequestContext, handle_request};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use gerrit_review_client::GerritClient;
use gerrit_review_core::config::Config;
use gerrit_review_core::constants;
use gerrit_review_core::error::McpError;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared state for the HTTP transport.
pub struct HttpState {
    pub config: Config,
    pub client: Option<GerritClient>,
    pub server_start: Instant,
}

pub fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", post(jsonrpc_handler))
        .with_state(state)
}

/// Serve until Ctrl-C. Tool calls run on the blocking pool, so concurrent
/// requests share the client's connection pool.
pub async fn run_http_server(
    state: Arc<HttpState>,
    bind_addr: &str,
    port: u16,
) -> Result<(), McpError> {
    let addr = format!("{}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MCP HTTP server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("MCP HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// GET /health
async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(build_health_response(&state))
}

fn build_health_response(state: &HttpState) -> Value {
    json!({
        "status": "ok",
        "server": constants::SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "gerrit_session": state.client.is_some(),
        "base_url": state
            .client
            .as_ref()
            .map(GerritClient::base_url)
            .or(state.config.gerrit.url.as_deref()),
        "uptime_seconds": state.server_start.elapsed().as_secs(),
    })
}

/// POST /
async fn jsonrpc_handler(State(state): State<Arc<HttpState>>, body: Bytes) -> impl IntoResponse {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            let body = json!({
                "error": {
                    "code": "invalid_input",
                    "message": format!("Invalid JSON request body: {}", e),
                }
            });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let result = tokio::task::spawn_blocking({
        let state = Arc::clone(&state);
        move || {
            handle_request(
                &request,
                &RequestContext {
                    config: &state.config,
                    client: state.client.as_ref(),
                },
            )
        }
    })
    .await;

    match result {
        Ok(Some(response)) => Json(response).into_response(),
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(e) => {
            let resp = JsonRpcResponse::error(None, INTERNAL_ERROR, format!("Internal error: {}", e));
            Json(resp).into_response()
        }
    }
}
