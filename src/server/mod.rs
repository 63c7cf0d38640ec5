//! MCP server exposing orchestration actions as tools and tasks as
//! resources.
//!
//! Messages are newline-delimited JSON-RPC 2.0 on standard input and output.
//! Refused actions come back as tool results flagged `isError`; malformed
//! requests get standard JSON-RPC error codes.

mod handler;
mod render;
mod stdio;
mod tools;

pub use handler::{
    McpServer, PROTOCOL_VERSION, RESOURCES_CHANGED, TASK_URI_PREFIX, ToolOutcome,
};
pub use stdio::{serve, serve_stdio};
pub use tools::{
    AssignTaskArgs, CompleteTaskArgs, CreateTaskArgs, ListTasksArgs, ReturnArgs, SwitchRoleArgs,
    ToolCall, ToolCallError, catalog,
};
