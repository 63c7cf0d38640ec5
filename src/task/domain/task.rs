//! Task aggregate and related value types.

use super::{BoardCardId, Role, TaskDomainError, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for allocating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: String,
    dependencies: Vec<String>,
    created_by: Role,
}

impl NewTask {
    /// Validates the required task fields.
    ///
    /// Blank text is rejected, but accepted text is kept exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskTitle`] or
    /// [`TaskDomainError::EmptyTaskDescription`] when either field is empty
    /// after trimming.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: Role,
    ) -> Result<Self, TaskDomainError> {
        let title_text = title.into();
        if title_text.trim().is_empty() {
            return Err(TaskDomainError::EmptyTaskTitle);
        }

        let description_text = description.into();
        if description_text.trim().is_empty() {
            return Err(TaskDomainError::EmptyTaskDescription);
        }

        Ok(Self {
            title: title_text,
            description: description_text,
            dependencies: Vec::new(),
            created_by,
        })
    }

    /// Sets dependency references, preserving their order.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = String>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }
}

/// Comment appended to a task's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    role: Role,
    comment: String,
    timestamp: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a comment stamped with the current clock time.
    #[must_use]
    pub fn new(role: Role, comment: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            role,
            comment: comment.into(),
            timestamp: clock.utc(),
        }
    }

    /// Returns the authoring role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.comment
    }

    /// Returns when the comment was written.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Unit of delegated work.
///
/// The identifier, creating role, and creation time never change after
/// allocation. Mutators leave `updated_at` alone; the owning
/// [`TaskStore`](super::TaskStore) stamps it on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    assigned_role: Option<Role>,
    created_by: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    git_branch: Option<String>,
    #[serde(default)]
    comments: Vec<TaskComment>,
    #[serde(default)]
    subtasks: Vec<TaskId>,
    #[serde(default)]
    board_card_id: Option<BoardCardId>,
}

impl Task {
    pub(super) fn allocate(id: TaskId, new_task: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            title: new_task.title,
            description: new_task.description,
            status: TaskStatus::Todo,
            assigned_role: None,
            created_by: new_task.created_by,
            created_at: timestamp,
            updated_at: timestamp,
            dependencies: new_task.dependencies,
            git_branch: None,
            comments: Vec::new(),
            subtasks: Vec::new(),
            board_card_id: None,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the role the task is delegated to, if any.
    #[must_use]
    pub const fn assigned_role(&self) -> Option<Role> {
        self.assigned_role
    }

    /// Returns the role that created the task.
    #[must_use]
    pub const fn created_by(&self) -> Role {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns dependency references in insertion order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns the associated git branch, if any.
    #[must_use]
    pub fn git_branch(&self) -> Option<&str> {
        self.git_branch.as_deref()
    }

    /// Returns the comment history in append order.
    #[must_use]
    pub fn comments(&self) -> &[TaskComment] {
        &self.comments
    }

    /// Returns subtask identifiers.
    #[must_use]
    pub fn subtasks(&self) -> &[TaskId] {
        &self.subtasks
    }

    /// Returns the linked board card, if any.
    #[must_use]
    pub const fn board_card_id(&self) -> Option<&BoardCardId> {
        self.board_card_id.as_ref()
    }

    /// Delegates the task to `role` and marks it in progress.
    pub fn assign(&mut self, role: Role) {
        self.assigned_role = Some(role);
        self.status = TaskStatus::InProgress;
    }

    /// Marks the task done and records the completion comment.
    pub fn complete(&mut self, comment: TaskComment) {
        self.status = TaskStatus::Done;
        self.comments.push(comment);
    }

    /// Links the task to a card on the external board.
    pub fn link_board_card(&mut self, card_id: BoardCardId) {
        self.board_card_id = Some(card_id);
    }

    /// Stamps `updated_at`, never moving it before `created_at`.
    pub(super) fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc().max(self.created_at);
    }
}
