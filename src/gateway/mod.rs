//! Axum HTTP surface for the router: session creation, message turns and
//! session inspection, behind a body limit and a request timeout.

mod handlers;

use handlers::{handle_create_session, handle_get_session, handle_health, handle_message};

use crate::chat::TurnOrchestrator;
use crate::config::Config;
use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TurnOrchestrator>,
}

/// `POST /session` body
#[derive(Debug, Default, serde::Deserialize)]
pub struct CreateSessionBody {
    #[serde(default)]
    pub initial_message: Option<String>,
}

/// `POST /message` body
#[derive(Debug, serde::Deserialize)]
pub struct MessageBody {
    pub session_id: String,
    pub content: String,
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let actual_port = listener.local_addr()?.port();
    let orchestrator = crate::app::build_orchestrator(&config).await?;
    let app = build_router(
        orchestrator,
        Duration::from_secs(config.gateway.request_timeout_secs),
    );

    tracing::info!(
        addr = %format!("{host}:{actual_port}"),
        session_backend = %config.session.backend,
        "AskHR router listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Route table plus the body-limit and timeout layers.
pub fn build_router(orchestrator: Arc<TurnOrchestrator>, request_timeout: Duration) -> Router {
    let state = AppState { orchestrator };

    Router::new()
        .route("/health", get(handle_health))
        .route("/session", post(handle_create_session))
        .route("/session/{id}", get(handle_get_session))
        .route("/message", post(handle_message))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
