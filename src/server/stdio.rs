//! Newline-delimited JSON-RPC transport.

use super::McpServer;
use crate::task::ports::SnapshotStore;
use mockable::Clock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

/// Serves requests read from `reader` until it reaches end of input.
///
/// Requests are handled one at a time; every outbound message is written as
/// a single line and flushed.
///
/// # Errors
///
/// Returns I/O errors from reading or writing the streams.
pub async fn serve<S, C, R, W>(
    server: &McpServer<S, C>,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    S: SnapshotStore + 'static,
    C: Clock + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        for message in server.handle_line(&line).await {
            writer.write_all(message.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;
    }
    Ok(())
}

/// Serves requests on standard input and output.
///
/// # Errors
///
/// Returns I/O errors from the standard streams.
pub async fn serve_stdio<S, C>(server: &McpServer<S, C>) -> std::io::Result<()>
where
    S: SnapshotStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    info!("serving MCP over stdio");
    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    info!("stdin closed, shutting down");
    Ok(())
}
