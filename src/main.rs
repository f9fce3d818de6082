//! crossbar — request-routing and dispatch core behind an HTTP server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request ──▶ http/server (axum adapter)
//!                              │
//!                              ▼
//!                        dispatch/dispatcher
//!                              │
//!                    ┌─────────┴─────────┐
//!                    ▼                   ▼
//!              routing/router      (no match → 404)
//!                    │
//!          ┌─────────┴──────────┐
//!          ▼                    ▼
//!      Redirect             Dispatch
//!      (reply now)          registry → action(Context)
//!                               │
//!                               ▼
//!                        session/manager
//!                        (lazy per-store sessions,
//!                         flushed once at end)
//! ```
//!
//! The binary wires a small demo application: a greeting page, a
//! session-backed visit counter, and a moved page that redirects.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;

use crossbar::config::{load_config, AppConfig};
use crossbar::dispatch::{Dispatcher, HandlerRegistry};
use crossbar::http::HttpServer;
use crossbar::routing::Router;
use crossbar::session::StoreRegistry;
use crossbar::Reply;

#[derive(Debug, Parser)]
#[command(name = "crossbar", about = "Request-routing and dispatch core")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    crossbar::observability::logging::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        session_store = %config.session.store,
        exception_details = config.exception_details,
        "Configuration loaded"
    );

    let router = Arc::new(Router::new());
    router.prepare(|set| {
        set.route("/").to("pages", "home")?;
        set.route("/visits").to("pages", "visits")?;
        set.route("/old/home").redirect("/", true)?;
        set.route("/pages/:action").to("pages", "home")?;
        Ok(())
    })?;

    let mut handlers = HandlerRegistry::new();
    handlers.register("pages", "home", |ctx| {
        let name = ctx.param("name").unwrap_or("world").to_string();
        Ok(Reply::text(format!("hello, {name}\n")))
    });
    handlers.register("pages", "visits", |ctx| {
        let session = ctx.session()?;
        let visits = session
            .get("visits")
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
            + 1;
        session.insert("visits", json!(visits));
        Ok(Reply::text(format!("visit #{visits}\n")))
    });

    let stores = Arc::new(StoreRegistry::from_config(&config.session));
    let dispatcher = Arc::new(Dispatcher::new(
        router,
        Arc::new(handlers),
        stores,
        &config,
    ));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, dispatcher);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
