//! Tool host that runs a board tool server as a child process over STDIO.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::jsonrpc::{Request, Response};
use crate::task::ports::{ToolHost, ToolHostError, ToolHostResult};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// Launch settings for the board tool server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdioToolHostConfig {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl StdioToolHostConfig {
    /// Creates settings for `command` with a 10 second call timeout.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets command-line arguments.
    #[must_use]
    pub fn with_args(mut self, values: impl IntoIterator<Item = String>) -> Self {
        self.args = values.into_iter().collect();
        self
    }

    /// Overrides the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the executable command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

struct Session {
    _child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl Session {
    fn spawn(config: &StdioToolHostConfig) -> ToolHostResult<Self> {
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(ToolHostError::runtime)?;
        let stdin = child.stdin.take().ok_or(ToolHostError::Disconnected)?;
        let stdout = child.stdout.take().ok_or(ToolHostError::Disconnected)?;
        Ok(Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 0,
        })
    }

    async fn send(&mut self, message: &Request) -> ToolHostResult<()> {
        let mut line = serde_json::to_vec(message).map_err(ToolHostError::runtime)?;
        line.push(b'\n');
        self.stdin
            .write_all(&line)
            .await
            .map_err(ToolHostError::runtime)?;
        self.stdin.flush().await.map_err(ToolHostError::runtime)
    }

    async fn request(&mut self, method: &str, params: Value) -> ToolHostResult<Value> {
        self.next_id += 1;
        let id = self.next_id;
        self.send(&Request::new(id, method, params)).await?;

        loop {
            let line = self
                .stdout
                .next_line()
                .await
                .map_err(ToolHostError::runtime)?
                .ok_or(ToolHostError::Disconnected)?;
            let Ok(response) = serde_json::from_str::<Response>(&line) else {
                debug!(line = %line, "ignoring non-response message from tool server");
                continue;
            };
            if response.id != json!(id) {
                continue;
            }
            if let Some(error) = response.error {
                return Err(ToolHostError::Protocol {
                    code: error.code,
                    message: error.message,
                });
            }
            return Ok(response.result.unwrap_or(Value::Null));
        }
    }

    async fn initialize(&mut self) -> ToolHostResult<()> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": { "name": "baton", "version": env!("CARGO_PKG_VERSION") },
                }),
            )
            .await?;
        let server_name = result
            .pointer("/serverInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(server = server_name, "board tool server initialised");
        self.send(&Request::notification("notifications/initialized", Value::Null))
            .await
    }
}

/// Tool host speaking MCP to a child process.
///
/// The child is started on first use and restarted after any failed call.
pub struct StdioToolHost {
    config: StdioToolHostConfig,
    session: Mutex<Option<Session>>,
}

impl StdioToolHost {
    /// Creates a host that will launch the configured server on first use.
    #[must_use]
    pub fn new(config: StdioToolHostConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    async fn call_in_session(
        &self,
        slot: &mut Option<Session>,
        tool: &str,
        arguments: Value,
    ) -> ToolHostResult<Value> {
        if slot.is_none() {
            let mut session = Session::spawn(&self.config)?;
            session.initialize().await?;
            *slot = Some(session);
        }
        let session = slot.as_mut().ok_or(ToolHostError::Disconnected)?;
        let result = session
            .request("tools/call", json!({ "name": tool, "arguments": arguments }))
            .await?;

        if result.get("isError").and_then(Value::as_bool) == Some(true) {
            let message = result
                .pointer("/content/0/text")
                .and_then(Value::as_str)
                .unwrap_or("tool reported an error")
                .to_owned();
            return Err(ToolHostError::ToolFailed {
                tool: tool.to_owned(),
                message,
            });
        }
        Ok(result)
    }
}

impl std::fmt::Debug for StdioToolHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdioToolHost")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolHost for StdioToolHost {
    async fn call_tool(&self, tool: &str, arguments: Value) -> ToolHostResult<Value> {
        let mut slot = self.session.lock().await;
        let outcome = tokio::time::timeout(
            self.config.timeout,
            self.call_in_session(&mut slot, tool, arguments),
        )
        .await
        .unwrap_or(Err(ToolHostError::Timeout(self.config.timeout)));

        if let Err(err) = &outcome
            && !matches!(err, ToolHostError::ToolFailed { .. })
        {
            warn!(
                command = %self.config.command,
                error = %err,
                "restarting board tool server on next call"
            );
            *slot = None;
        }
        outcome
    }
}
