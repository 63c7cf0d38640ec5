//! Tool host port used to broker board operations through a tool server.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tool host operations.
pub type ToolHostResult<T> = Result<T, ToolHostError>;

/// Invokes named tools on an external tool server.
#[async_trait]
pub trait ToolHost: Send + Sync {
    /// Calls `tool` with JSON `arguments` and returns the raw tool result.
    ///
    /// # Errors
    ///
    /// Returns [`ToolHostError`] when the server cannot be reached, answers
    /// with a protocol error, or reports the tool call as failed.
    async fn call_tool(&self, tool: &str, arguments: Value) -> ToolHostResult<Value>;
}

/// Errors returned by tool host implementations.
#[derive(Debug, Clone, Error)]
pub enum ToolHostError {
    /// The tool server did not answer in time.
    #[error("tool server did not answer within {0:?}")]
    Timeout(std::time::Duration),

    /// The tool server closed its connection.
    #[error("tool server closed the connection")]
    Disconnected,

    /// The tool server answered with a protocol-level error.
    #[error("tool server protocol error {code}: {message}")]
    Protocol {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// The tool ran but reported failure.
    #[error("tool {tool} failed: {message}")]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// Failure text reported by the tool.
        message: String,
    },

    /// Generic runtime failure.
    #[error("tool host runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ToolHostError {
    /// Wraps a runtime error from the host adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
