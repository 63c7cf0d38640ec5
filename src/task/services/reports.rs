//! Result descriptors returned by orchestration actions.

use crate::task::{
    domain::{BoardCardId, PermissionSet, Role, RoleTransition, Task, TaskStatus},
    ports::BoardMirrorMode,
};

/// Whether a newly created task was linked to a board card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    /// The mirror created a card and the task now references it.
    Linked(BoardCardId),
    /// No card was created; the task exists only in the local store.
    SavedLocally,
}

/// Outcome of [`create_task`](super::OrchestrationService::create_task).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    /// The stored task, including any linked card.
    pub task: Task,
    /// Board mirror outcome.
    pub card: CardOutcome,
}

/// Read-only snapshot of the engine's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Currently active role.
    pub active_role: Role,
    /// Permissions held by the active role.
    pub permissions: PermissionSet,
    /// Number of stored tasks.
    pub total_tasks: usize,
    /// Task count for every status, in declaration order.
    pub counts_by_status: Vec<(TaskStatus, usize)>,
    /// Up to five most recent transitions, oldest first.
    pub recent_transitions: Vec<RoleTransition>,
    /// How the board mirror is connected.
    pub board_mode: BoardMirrorMode,
    /// Whether a durable task snapshot exists.
    pub snapshot_present: bool,
}

/// Counts written by [`export_snapshot`](super::OrchestrationService::export_snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Tasks persisted.
    pub tasks: usize,
    /// Transitions persisted.
    pub transitions: usize,
}

/// A role together with its description and permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleProfile {
    /// The role.
    pub role: Role,
    /// One-line description.
    pub description: &'static str,
    /// Granted permissions.
    pub permissions: PermissionSet,
}

impl RoleProfile {
    /// Builds the profile of `role` from the static permission table.
    #[must_use]
    pub const fn of(role: Role) -> Self {
        Self {
            role,
            description: role.description(),
            permissions: role.permissions(),
        }
    }
}

/// Counts produced by [`sync_board_mirror`](super::OrchestrationService::sync_board_mirror).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Tasks that gained a card during this sync.
    pub synced: usize,
    /// Existing cards refreshed without error.
    pub updated: usize,
}
