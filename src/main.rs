//! linkhook
//!
//! Receives link notifications over HTTP and runs a configured command for
//! the first rule whose page and link globs both match.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST {page, link, ...}
//!   ──────────────────────▶ http::server ──▶ 200 / 400 (immediately)
//!                                │
//!                                │ tokio::spawn (detached)
//!                                ▼
//!                        dispatch::dispatcher
//!                                │
//!                                ▼
//!                          routing::RuleSet ── first match ──▶ dispatch::runner
//!                        (globs compiled once                  `name args... link`
//!                         from config.<os>.json)
//! ```

use clap::Parser;

use linkhook::lifecycle::{startup, Cli, Shutdown};
use linkhook::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init_logging();

    tracing::info!("linkhook v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    startup::run(cli, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
