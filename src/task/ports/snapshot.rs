//! Durable snapshot port for the task store and transition log.

use crate::task::domain::{RoleTransition, Task, TaskStore, TransitionLog};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Durable snapshot contract.
///
/// Loads happen once at start-up; saves happen after every mutating action.
/// Implementations must never leave a partially written snapshot behind.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads persisted tasks. A missing snapshot loads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot exists but cannot be read
    /// or decoded.
    async fn load_tasks(&self) -> SnapshotResult<Vec<Task>>;

    /// Replaces the persisted tasks with the contents of `tasks`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot cannot be written.
    async fn save_tasks(&self, tasks: &TaskStore) -> SnapshotResult<()>;

    /// Loads persisted transitions in chronological order. A missing
    /// snapshot loads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot exists but cannot be read
    /// or decoded.
    async fn load_transitions(&self) -> SnapshotResult<Vec<RoleTransition>>;

    /// Replaces the persisted transitions with the contents of `log`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot cannot be written.
    async fn save_transitions(&self, log: &TransitionLog) -> SnapshotResult<()>;

    /// Returns `true` when a task snapshot currently exists.
    async fn is_present(&self) -> bool;
}

/// Errors returned by snapshot store implementations.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    /// Reading or writing the underlying storage failed.
    #[error("snapshot I/O error: {0}")]
    Io(Arc<std::io::Error>),

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot format error: {0}")]
    Format(Arc<serde_json::Error>),
}

impl SnapshotError {
    /// Wraps an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }

    /// Wraps an encoding or decoding error.
    #[must_use]
    pub fn format(err: serde_json::Error) -> Self {
        Self::Format(Arc::new(err))
    }
}
