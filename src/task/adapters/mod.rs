//! Adapter implementations for task orchestration ports.

pub mod board;
pub mod json_file;
pub mod memory;
pub mod stdio_host;

pub use json_file::{DEFAULT_TASKS_FILE, DEFAULT_TRANSITIONS_FILE, JsonFileSnapshotStore};
pub use stdio_host::{StdioToolHost, StdioToolHostConfig};
