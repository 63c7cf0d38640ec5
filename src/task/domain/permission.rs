//! Capabilities that gate orchestration actions.

use super::Role;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A named capability held by a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create new tasks.
    CreateTask,
    /// Delegate tasks to specialist roles.
    AssignTask,
    /// Complete tasks assigned to the active role.
    CompleteTask,
    /// Modify existing task fields.
    UpdateTask,
    /// Remove tasks from the store.
    DeleteTask,
    /// Read every task regardless of assignee.
    ViewAllTasks,
    /// Move the active role to a specialist.
    SwitchRole,
    /// Export snapshots and reports.
    ExportData,
    /// Administer the role catalogue.
    ManageRoles,
}

impl Permission {
    /// Every permission in declaration order.
    pub const ALL: [Self; 9] = [
        Self::CreateTask,
        Self::AssignTask,
        Self::CompleteTask,
        Self::UpdateTask,
        Self::DeleteTask,
        Self::ViewAllTasks,
        Self::SwitchRole,
        Self::ExportData,
        Self::ManageRoles,
    ];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::AssignTask => "assign_task",
            Self::CompleteTask => "complete_task",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::ViewAllTasks => "view_all_tasks",
            Self::SwitchRole => "switch_role",
            Self::ExportData => "export_data",
            Self::ManageRoles => "manage_roles",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compact, copyable set of permissions.
///
/// Iteration yields permissions in declaration order. Serialises as a list
/// of permission names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionSet(u16);

impl PermissionSet {
    /// The set holding no permissions.
    pub const EMPTY: Self = Self(0);

    /// The set holding every permission.
    pub const ALL: Self = Self::EMPTY
        .with(Permission::CreateTask)
        .with(Permission::AssignTask)
        .with(Permission::CompleteTask)
        .with(Permission::UpdateTask)
        .with(Permission::DeleteTask)
        .with(Permission::ViewAllTasks)
        .with(Permission::SwitchRole)
        .with(Permission::ExportData)
        .with(Permission::ManageRoles);

    /// Returns a copy of this set that also holds `permission`.
    #[must_use]
    pub const fn with(self, permission: Permission) -> Self {
        Self(self.0 | permission.bit())
    }

    /// Returns `true` when the set holds `permission`.
    #[must_use]
    pub const fn contains(self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    /// Returns `true` when the set holds no permissions.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of permissions held.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates held permissions in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Permission> {
        Permission::ALL
            .into_iter()
            .filter(move |permission| self.contains(*permission))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Permission::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

/// Looks up the permissions of a role by name.
///
/// Unknown role names hold no permissions.
#[must_use]
pub fn permissions_for_name(role_name: &str) -> PermissionSet {
    Role::try_from(role_name).map_or(PermissionSet::EMPTY, Role::permissions)
}
