//! Startup orchestration.
//!
//! # Responsibilities
//! - Parse the command line
//! - Load and validate configuration
//! - Compile rules and build the HTTP server
//! - Start the metrics exporter if requested
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{self, Config, ConfigError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Parser)]
#[command(name = "linkhook")]
#[command(about = "Run commands for links posted to a webhook", long_about = None)]
pub struct Cli {
    /// Config file to load instead of config.<os>.json in the working directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9090)
    #[arg(long)]
    pub metrics_address: Option<SocketAddr>,
}

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start metrics exporter on {address}: {source}")]
    Metrics {
        address: SocketAddr,
        #[source]
        source: BuildError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Load the config named on the command line, or the one for this OS.
pub fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    match &cli.config {
        Some(path) => config::load_config(path),
        None => config::load(),
    }
}

/// Start the service and serve until `shutdown` fires.
pub async fn run(cli: Cli, shutdown: Shutdown) -> Result<(), StartupError> {
    let config = load_config(&cli)?;

    tracing::info!(
        port = %config.port,
        rules = config.rules.len(),
        "Configuration loaded"
    );

    let address = config.bind_address();
    let server = HttpServer::new(&config)?;

    if let Some(address) = cli.metrics_address {
        metrics::init_metrics(address)
            .map_err(|source| StartupError::Metrics { address, source })?;
    }

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
