//! In-memory adapters for tests and local deterministic runs.

mod board;
mod snapshot;
mod tool_host;

pub use board::{InMemoryBoardMirror, RecordedCard};
pub use snapshot::InMemorySnapshotStore;
pub use tool_host::{InMemoryToolHost, RecordedToolCall};
