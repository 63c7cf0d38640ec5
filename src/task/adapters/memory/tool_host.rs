//! In-memory tool host for brokered board mirror tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::ports::{ToolHost, ToolHostError, ToolHostResult};

/// Tool call recorded by [`InMemoryToolHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedToolCall {
    /// Tool name.
    pub tool: String,
    /// Arguments passed to the tool.
    pub arguments: Value,
}

/// Tool host answering with scripted results.
///
/// Tools without a scripted result answer with an empty content list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolHost {
    state: Arc<RwLock<InMemoryToolHostState>>,
}

#[derive(Debug, Default)]
struct InMemoryToolHostState {
    results: HashMap<String, Result<Value, String>>,
    calls: Vec<RecordedToolCall>,
}

fn lock_error(err: impl std::fmt::Display) -> ToolHostError {
    ToolHostError::runtime(std::io::Error::other(err.to_string()))
}

impl InMemoryToolHost {
    /// Creates a host with no scripted results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the result returned for `tool`.
    ///
    /// # Errors
    ///
    /// Returns tool host errors when lock acquisition fails.
    pub fn set_result(&self, tool: &str, result: Value) -> ToolHostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.results.insert(tool.to_owned(), Ok(result));
        Ok(())
    }

    /// Scripts `tool` to report failure with `message`.
    ///
    /// # Errors
    ///
    /// Returns tool host errors when lock acquisition fails.
    pub fn set_failure(&self, tool: &str, message: &str) -> ToolHostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .results
            .insert(tool.to_owned(), Err(message.to_owned()));
        Ok(())
    }

    /// Returns every call received so far.
    ///
    /// # Errors
    ///
    /// Returns tool host errors when lock acquisition fails.
    pub fn calls(&self) -> ToolHostResult<Vec<RecordedToolCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls.clone())
    }
}

#[async_trait]
impl ToolHost for InMemoryToolHost {
    async fn call_tool(&self, tool: &str, arguments: Value) -> ToolHostResult<Value> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(RecordedToolCall {
            tool: tool.to_owned(),
            arguments,
        });
        match state.results.get(tool) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(ToolHostError::ToolFailed {
                tool: tool.to_owned(),
                message: message.clone(),
            }),
            None => Ok(serde_json::json!({ "content": [] })),
        }
    }
}
