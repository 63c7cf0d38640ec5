//! Port contracts for task orchestration.
//!
//! Ports define infrastructure-agnostic interfaces used by the orchestration
//! service: durable snapshots, the external board mirror, and the tool host a
//! brokered board mirror talks through.

pub mod board;
pub mod snapshot;
pub mod tool_host;

pub use board::{BoardMirror, BoardMirrorError, BoardMirrorMode, BoardMirrorResult};
pub use snapshot::{SnapshotError, SnapshotResult, SnapshotStore};
pub use tool_host::{ToolHost, ToolHostError, ToolHostResult};
