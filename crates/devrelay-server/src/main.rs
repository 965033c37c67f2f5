//! devrelay - local development server with a real-time message relay.

use anyhow::Result;
use clap::Parser;
use devrelay_server::{config, logging, routes, scaffold, state};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use logging::{LogConfig, LogFormat};
use state::AppState;

/// devrelay - static files, on-demand bundles and a WebSocket message relay.
#[derive(Parser, Debug)]
#[command(name = "devrelay")]
#[command(about = "Local development server with a WebSocket message relay")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Override project root from config
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Do not create missing project folders and starter files
    #[arg(long)]
    no_init: bool,

    /// Enable verbose logging (INFO level for most targets)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (every relayed frame)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "relay=debug").
    /// Can be specified multiple times. Targets are prefixed with "devrelay::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(root) = cli.root {
        config.root_dir = root;
    }
    if cli.no_init {
        config.init_project = false;
    }

    tracing::info!(
        target: "devrelay::startup",
        "Loaded configuration (port: {}, root: {})",
        config.port,
        config.root_dir.display()
    );

    if config.init_project {
        scaffold::init_project_files(&config)?;
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState::new(config));
    let app = routes::router(state);

    tracing::info!(target: "devrelay::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(target: "devrelay::startup", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "devrelay::startup", "Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
