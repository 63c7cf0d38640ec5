//! Role hand-off records and the append-only transition log.

use super::{Role, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Immutable record of control passing from one role to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTransition {
    from_role: Role,
    to_role: Role,
    task_id: Option<TaskId>,
    reason: String,
    timestamp: DateTime<Utc>,
}

impl RoleTransition {
    /// Records a hand-off stamped with the current clock time.
    #[must_use]
    pub fn new(from_role: Role, to_role: Role, reason: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            from_role,
            to_role,
            task_id: None,
            reason: reason.into(),
            timestamp: clock.utc(),
        }
    }

    /// Associates the hand-off with a task.
    #[must_use]
    pub const fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Returns the role giving up control.
    #[must_use]
    pub const fn from_role(&self) -> Role {
        self.from_role
    }

    /// Returns the role receiving control.
    #[must_use]
    pub const fn to_role(&self) -> Role {
        self.to_role
    }

    /// Returns the associated task, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the recorded reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns when the hand-off happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Append-only, chronologically ordered sequence of role transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionLog {
    entries: Vec<RoleTransition>,
}

impl TransitionLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuilds a log from persisted entries, keeping their order.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = RoleTransition>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Appends a transition.
    pub fn append(&mut self, transition: RoleTransition) {
        self.entries.push(transition);
    }

    /// Returns up to the last `count` transitions, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> &[RoleTransition] {
        let start = self.entries.len().saturating_sub(count);
        self.entries.get(start..).unwrap_or_default()
    }

    /// Returns every transition, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[RoleTransition] {
        &self.entries
    }

    /// Returns the most recent transition, if any.
    #[must_use]
    pub fn last(&self) -> Option<&RoleTransition> {
        self.entries.last()
    }

    /// Returns the number of recorded transitions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
