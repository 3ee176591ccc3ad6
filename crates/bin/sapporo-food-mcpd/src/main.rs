//! Daemon entry point for the Sapporo food-license MCP server.
//!
//! Loads configuration from the environment, builds the catalog client, and
//! serves the MCP protocol over stdio or streamable HTTP.

mod config;

use std::sync::Arc;

use sapporo_food_core::catalog::{CatalogClient, CatalogConfig};
use sapporo_food_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::DaemonConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = DaemonConfig::from_args()?;
    let catalog_config = CatalogConfig::new(config.resource_id.clone())
        .with_base_url(config.ckan_base.clone())
        .with_timeout(config.request_timeout);
    let catalog = Arc::new(CatalogClient::new(catalog_config)?);

    if config.enable_stdio {
        info!("serving MCP over stdio");
        serve_stdio(catalog).await?;
    } else {
        info!(addr = %config.mcp_http_addr, "serving MCP over streamable HTTP");
        serve_streamable_http(catalog, McpHttpServerConfig::new(config.mcp_http_addr)).await?;
    }
    Ok(())
}

// Logs go to stderr so the stdio transport stays clean.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
