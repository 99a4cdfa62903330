//! # Thoughtline MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to Thoughtline.
//!
//! Reads configuration from environment variables:
//! - `THOUGHTLINE_URL`: Thoughtline server URL (default: `http://localhost:8080`)
//!
//! Talks MCP over stdio and forwards tool calls to the Thoughtline HTTP API.

mod client;
mod server;

use client::ThoughtlineClient;
use rmcp::{ServiceExt, transport::stdio};
use server::ThoughtlineMcp;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout is reserved for the MCP stdio transport.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let url = std::env::var("THOUGHTLINE_URL").unwrap_or_else(|_| "http://localhost:8080".into());

    tracing::info!("Thoughtline MCP server starting, target: {}", url);

    let mcp = ThoughtlineMcp::new(ThoughtlineClient::new(url));

    let service = mcp.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP serve error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
