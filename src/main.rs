//! Runs the baton MCP server on standard input and output.
//!
//! Usage:
//!
//! ```text
//! baton [--data-dir DIR] [--board-mode auto|disabled|direct|brokered]
//! ```
//!
//! Every flag also reads an environment variable (`BATON_DATA_DIR`,
//! `BATON_BOARD_MODE`, `TRELLO_API_KEY`, `TRELLO_TOKEN`,
//! `TRELLO_WORKING_BOARD_ID`, `BATON_BOARD_BROKER_COMMAND`, ...), so an MCP
//! client can configure the server from its launch settings alone. Logs go to
//! standard error and honour `RUST_LOG`.

use baton::config::{LogFormat, Settings};
use baton::server::{McpServer, serve_stdio};
use baton::task::services::OrchestrationService;
use baton::telemetry::init_tracing;
use clap::Parser;
use mockable::DefaultClock;
use std::sync::Arc;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = Settings::parse();
    init_tracing(settings.log_format == LogFormat::Json, Level::INFO);

    let snapshots = Arc::new(settings.snapshot_store()?);
    let board = settings.connect_board_mirror().await?;
    let service = OrchestrationService::load(snapshots, board, Arc::new(DefaultClock)).await;

    serve_stdio(&McpServer::new(Arc::new(service))).await?;
    Ok(())
}
