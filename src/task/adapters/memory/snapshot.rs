//! In-memory snapshot store for orchestration tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{RoleTransition, Task, TaskStore, TransitionLog},
    ports::{SnapshotError, SnapshotResult, SnapshotStore},
};

/// Thread-safe in-memory snapshot store.
///
/// Records every save so tests can assert on what was persisted, and can be
/// switched into a failing mode to exercise fail-soft persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    state: Arc<RwLock<InMemorySnapshotState>>,
}

#[derive(Debug, Default)]
struct InMemorySnapshotState {
    tasks: Option<Vec<Task>>,
    transitions: Option<Vec<RoleTransition>>,
    task_saves: usize,
    transition_saves: usize,
    write_failure: Option<String>,
}

fn lock_error(err: impl std::fmt::Display) -> SnapshotError {
    SnapshotError::io(std::io::Error::other(err.to_string()))
}

impl InMemorySnapshotStore {
    /// Creates an empty store with no snapshot present.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with a snapshot.
    #[must_use]
    pub fn seeded(tasks: Vec<Task>, transitions: Vec<RoleTransition>) -> Self {
        let state = InMemorySnapshotState {
            tasks: Some(tasks),
            transitions: Some(transitions),
            ..InMemorySnapshotState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Makes every subsequent save fail with `message`, or succeed again
    /// when `None`.
    ///
    /// # Errors
    ///
    /// Returns snapshot errors when lock acquisition fails.
    pub fn set_write_failure(&self, message: Option<&str>) -> SnapshotResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.write_failure = message.map(str::to_owned);
        Ok(())
    }

    /// Returns the last saved tasks.
    ///
    /// # Errors
    ///
    /// Returns snapshot errors when lock acquisition fails.
    pub fn stored_tasks(&self) -> SnapshotResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.clone().unwrap_or_default())
    }

    /// Returns the last saved transitions.
    ///
    /// # Errors
    ///
    /// Returns snapshot errors when lock acquisition fails.
    pub fn stored_transitions(&self) -> SnapshotResult<Vec<RoleTransition>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.transitions.clone().unwrap_or_default())
    }

    /// Returns how many times tasks and transitions have been saved.
    ///
    /// # Errors
    ///
    /// Returns snapshot errors when lock acquisition fails.
    pub fn save_counts(&self) -> SnapshotResult<(usize, usize)> {
        let state = self.state.read().map_err(lock_error)?;
        Ok((state.task_saves, state.transition_saves))
    }
}

fn check_writable(state: &InMemorySnapshotState) -> SnapshotResult<()> {
    state.write_failure.as_ref().map_or(Ok(()), |message| {
        Err(SnapshotError::io(std::io::Error::other(message.clone())))
    })
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load_tasks(&self) -> SnapshotResult<Vec<Task>> {
        self.stored_tasks()
    }

    async fn save_tasks(&self, tasks: &TaskStore) -> SnapshotResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        check_writable(&state)?;
        state.tasks = Some(tasks.iter().cloned().collect());
        state.task_saves += 1;
        Ok(())
    }

    async fn load_transitions(&self) -> SnapshotResult<Vec<RoleTransition>> {
        self.stored_transitions()
    }

    async fn save_transitions(&self, log: &TransitionLog) -> SnapshotResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        check_writable(&state)?;
        state.transitions = Some(log.entries().to_vec());
        state.transition_saves += 1;
        Ok(())
    }

    async fn is_present(&self) -> bool {
        self.state
            .read()
            .map(|state| state.tasks.is_some())
            .unwrap_or(false)
    }
}
