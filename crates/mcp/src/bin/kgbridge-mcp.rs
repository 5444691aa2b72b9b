// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use kgbridge_core::{BridgeConfig, QueryExecutor};
use kgbridge_mcp::{Dispatcher, McpServer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "kgbridge-mcp")]
#[command(about = "MCP server exposing SPARQL knowledge graphs as tools", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "KGBRIDGE_CONFIG", default_value = "kgbridge.toml")]
    config: PathBuf,

    /// Per-query timeout in milliseconds (overrides the configuration file)
    #[arg(long, env = "KGBRIDGE_TIMEOUT_MS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Federated SPARQL endpoint (overrides the configuration file)
    #[arg(long, env = "KGBRIDGE_FEDERATED_URL")]
    federated_url: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kgbridge=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = BridgeConfig::load(&args.config).context("Failed to load configuration")?;
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(url) = args.federated_url {
        config.federated_url = url;
    }

    let registry = Arc::new(config.registry().context("Invalid endpoint registry")?);
    let executor =
        Arc::new(QueryExecutor::from_config(&config).context("Failed to create HTTP client")?);

    tracing::info!(
        "Loaded {} knowledge graph endpoints (federated: {})",
        registry.len(),
        registry.federated_url()
    );

    let server = McpServer::new(Dispatcher::new(registry, executor, config.timeout()));

    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    tracing::info!("kgbridge MCP server ready on stdio");
    server.serve_stdio().await
}
