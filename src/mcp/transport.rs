//! Transport layer for MCP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::tower::{
    StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::ServiceExt;
use tracing::info;

use crate::config::TransportType;
use crate::mcp::CalendarMcpServer;

/// Run the MCP server with stdio transport.
pub async fn run_stdio(server: CalendarMcpServer) -> Result<()> {
    info!("Starting calendar MCP server with stdio transport");

    let service = server.serve(stdio()).await?;

    info!("Calendar MCP server running...");
    service.waiting().await?;

    info!("Calendar MCP server shutting down");
    Ok(())
}

/// Build the HTTP router: health and info routes, with every other path
/// handled by the Streamable HTTP MCP service.
pub fn mcp_http_router(server: CalendarMcpServer) -> Router {
    let session_manager = Arc::new(LocalSessionManager::default());

    // Each session gets a clone sharing the same API client
    let http_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        session_manager,
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(root_handler))
        .fallback_service(http_service)
}

/// Run the MCP server with HTTP/SSE (Streamable HTTP) transport.
pub async fn run_http(server: CalendarMcpServer, port: u16) -> Result<()> {
    info!(
        "Starting calendar MCP server with HTTP/SSE transport on port {}",
        port
    );

    let app = mcp_http_router(server);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Calendar MCP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    info!("Calendar MCP server shutting down");
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Root handler with basic info.
async fn root_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Academic calendar MCP server",
        "endpoints": {
            "health": "/health"
        }
    }))
}

/// Run the MCP server with the configured transport.
pub async fn run_server(
    server: CalendarMcpServer,
    transport: TransportType,
    port: u16,
) -> Result<()> {
    match transport {
        TransportType::Stdio => run_stdio(server).await,
        TransportType::Http => run_http(server, port).await,
    }
}
