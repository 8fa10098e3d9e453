//! lantern host entry point.
//!
//! Boots the cache agent, drives install and activate, then serves lifecycle
//! and fetch tools over MCP on stdio. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use lantern_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod agent;
mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let agent = Arc::new(agent::build(&config).await?);

    if config.auto_start {
        // A failed install leaves the agent redundant; requests then pass
        // straight to the network until an install succeeds.
        match agent.start().await {
            Ok(report) => tracing::info!(
                bucket = %report.install.bucket,
                stored = report.install.stored,
                deleted = report.activate.deleted.len(),
                "cache agent active"
            ),
            Err(e) => tracing::error!(error = %e, "cache agent failed to start"),
        }
    }

    tracing::info!("Starting lantern server on stdio transport");

    let handler = handler::LanternServer::new(agent);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
