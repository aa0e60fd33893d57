//! # Mikra MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to Mikra.
//!
//! Reads configuration from environment variables:
//! - `MIKRA_URL`: Mikra server URL (default: `http://localhost:8080`)
//! - `MIKRA_API_KEY`: Optional Bearer token for authentication
//! - `MIKRA_EDITION`: Edition used when a tool call names none (default: `wlc`)
//!
//! Talks MCP over stdio and forwards tool calls to the Mikra HTTP API.

mod client;
mod server;

use client::MikraClient;
use rmcp::{ServiceExt, transport::stdio};
use server::MikraMcp;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let url = std::env::var("MIKRA_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let api_key = std::env::var("MIKRA_API_KEY").ok().filter(|k| !k.is_empty());
    let edition = std::env::var("MIKRA_EDITION").unwrap_or_else(|_| "wlc".into());

    tracing::info!(target_url = %url, edition = %edition, "Mikra MCP server starting");

    let client = MikraClient::new(url, api_key);
    let mcp = MikraMcp::new(client, edition);

    let service = mcp.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP serve error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
