//! Streamable HTTP transport: MCP at `/mcp`, liveness at `/health`.

use crate::server::EvolutionServer;
use anyhow::Context as _;
use axum::{Json, Router, routing::get};
use evolution_mcp_tools::{Dispatcher, listing};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn serve(bind: SocketAddr, dispatcher: Dispatcher) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let app = router(EvolutionServer::new(dispatcher));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    info!(addr = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

    tokio::spawn(watch_ctrl_c(shutdown.clone()));
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("http server")?;

    info!("http server stopped");
    Ok(())
}

fn router(handler: EvolutionServer) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(handler.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );
    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "tools": listing::tools().len(),
        "fingerprint": listing::fingerprint(),
    }))
}

async fn watch_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!("ctrl-c received, shutting down");
    shutdown.cancel();
}
