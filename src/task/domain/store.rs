//! In-memory task collection with sequential identifier allocation.

use super::{NewTask, Task, TaskId, TaskStatus};
use mockable::Clock;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by [`TaskStore`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Every representable identifier has been allocated.
    #[error("task identifier sequence exhausted")]
    SequenceExhausted,
}

/// Ordered collection of tasks keyed by identifier.
///
/// Identifiers are allocated from the highest sequence number the store has
/// ever held, so they strictly increase and iteration order matches
/// allocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: BTreeMap<TaskId, Task>,
    last_sequence: u32,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted tasks.
    ///
    /// The identifier counter resumes after the largest suffix observed, so
    /// gaps left by missing tasks are never refilled by later allocations.
    #[must_use]
    pub fn from_tasks(persisted: impl IntoIterator<Item = Task>) -> Self {
        let tasks: BTreeMap<TaskId, Task> = persisted
            .into_iter()
            .map(|task| (task.id(), task))
            .collect();
        let last_sequence = tasks.keys().next_back().map_or(0, |id| id.sequence());
        Self {
            tasks,
            last_sequence,
        }
    }

    /// Returns the identifier the next allocation will use.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::SequenceExhausted`] when no identifiers
    /// remain.
    pub fn next_id(&self) -> Result<TaskId, TaskStoreError> {
        self.last_sequence
            .checked_add(1)
            .and_then(|sequence| TaskId::from_sequence(sequence).ok())
            .ok_or(TaskStoreError::SequenceExhausted)
    }

    /// Allocates and stores a new task in `Todo`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::SequenceExhausted`] when no identifiers
    /// remain.
    pub fn create_task(
        &mut self,
        new_task: NewTask,
        clock: &impl Clock,
    ) -> Result<Task, TaskStoreError> {
        let id = self.next_id()?;
        let task = Task::allocate(id, new_task, clock);
        self.last_sequence = id.sequence();
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Finds a task by textual reference.
    ///
    /// References that are not valid identifiers resolve to `None`.
    #[must_use]
    pub fn find(&self, reference: &str) -> Option<&Task> {
        TaskId::parse(reference)
            .ok()
            .and_then(|id| self.tasks.get(&id))
    }

    /// Finds a task whose canonical identifier equals `reference` exactly.
    ///
    /// Unlike [`TaskStore::find`], case and zero padding must match the
    /// rendered `TASK-NNN` form.
    #[must_use]
    pub fn get_exact(&self, reference: &str) -> Option<&Task> {
        self.find(reference)
            .filter(|task| task.id().to_string() == reference)
    }

    /// Returns tasks in allocation order, optionally filtered by status.
    #[must_use]
    pub fn list(&self, status: Option<TaskStatus>) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
            .collect()
    }

    /// Iterates all tasks in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Returns the identifiers of all tasks in allocation order.
    #[must_use]
    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.keys().copied().collect()
    }

    /// Returns the number of tasks held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when no tasks are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Counts tasks with the given status.
    #[must_use]
    pub fn count_with_status(&self, status: TaskStatus) -> usize {
        self.tasks
            .values()
            .filter(|task| task.status() == status)
            .count()
    }

    /// Applies `mutate` to a task and stamps its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    pub fn update(
        &mut self,
        id: &TaskId,
        clock: &impl Clock,
        mutate: impl FnOnce(&mut Task),
    ) -> Result<&Task, TaskStoreError> {
        let task = self.tasks.get_mut(id).ok_or(TaskStoreError::NotFound(*id))?;
        mutate(task);
        task.touch(clock);
        Ok(task)
    }

    /// Returns the first dependency of `task` that exists here and is not
    /// done.
    ///
    /// Dependencies are checked in stored order. References that are not the
    /// exact identifier of a stored task count as satisfied.
    #[must_use]
    pub fn first_blocking_dependency(&self, task: &Task) -> Option<TaskId> {
        task.dependencies()
            .iter()
            .filter_map(|reference| self.get_exact(reference))
            .find(|dependency| dependency.status() != TaskStatus::Done)
            .map(Task::id)
    }
}
