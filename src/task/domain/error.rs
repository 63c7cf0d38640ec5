//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier does not follow `TASK-NNN` format.
    #[error("invalid task identifier '{0}', expected TASK-NNN")]
    InvalidTaskId(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyTaskDescription,

    /// A board card identifier is empty after trimming.
    #[error("board card identifier must not be empty")]
    EmptyBoardCardId,

    /// The role name is not one of the known roles.
    #[error(transparent)]
    UnknownRole(#[from] ParseRoleError),

    /// The status name is not one of the known task statuses.
    #[error(transparent)]
    UnknownStatus(#[from] ParseTaskStatusError),

    /// Tasks are delegated to specialist roles, never to the orchestrator.
    #[error("tasks cannot be assigned to the orchestrator")]
    OrchestratorNotAssignable,

    /// The orchestrator cannot switch into its own role.
    #[error("already in the orchestrator role, choose a specialist role")]
    CannotSwitchToOrchestrator,
}

/// Error returned while parsing a role name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing a task status name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
