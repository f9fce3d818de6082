//! HTTP transport adapter.
//!
//! # Responsibilities
//! - Mount the dispatcher behind an axum catch-all route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Translate between axum requests and the core's request head
//! - Bind the server and serve with graceful shutdown
//!
//! # Design Decisions
//! - The core stays transport-agnostic: this file is the only place
//!   that touches axum requests or sockets
//! - Request bodies are dropped; the dispatch core routes on the head
//! - `x-forwarded-proto: https` marks a request as TLS-terminated

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::http::{Protocol, RequestHead};

/// Application state injected into the handler.
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

/// HTTP server wrapping the dispatch core.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server serving the given dispatcher.
    pub fn new(config: AppConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState { dispatcher };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Catch-all handler: translate, dispatch, reply.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> impl IntoResponse {
    let (parts, _body) = request.into_parts();

    let forwarded_https = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("https"))
        .unwrap_or(false);

    let mut head = RequestHead::new(parts.method, &parts.uri, parts.version, parts.headers);
    if forwarded_https {
        head = head.with_protocol(Protocol::Https);
    }

    state.dispatcher.handle(&head)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
