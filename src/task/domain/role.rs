//! Actor roles and the static role-to-permission table.

use super::{ParseRoleError, Permission, PermissionSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor identity holding a fixed permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Coordinates work: creates, delegates, and reviews tasks.
    Orchestrator,
    /// Designs structure and plans implementation work.
    Architect,
    /// Implements assigned tasks.
    Coder,
    /// Investigates requirements and data.
    Analyst,
    /// Handles build, deployment, and infrastructure work.
    DevOps,
}

const ARCHITECT_PERMISSIONS: PermissionSet = PermissionSet::EMPTY
    .with(Permission::CreateTask)
    .with(Permission::AssignTask)
    .with(Permission::CompleteTask)
    .with(Permission::UpdateTask)
    .with(Permission::ViewAllTasks)
    .with(Permission::ExportData);

const CODER_PERMISSIONS: PermissionSet = PermissionSet::EMPTY
    .with(Permission::CompleteTask)
    .with(Permission::UpdateTask)
    .with(Permission::ViewAllTasks);

const ANALYST_PERMISSIONS: PermissionSet = PermissionSet::EMPTY
    .with(Permission::CreateTask)
    .with(Permission::CompleteTask)
    .with(Permission::UpdateTask)
    .with(Permission::ViewAllTasks)
    .with(Permission::ExportData);

const DEVOPS_PERMISSIONS: PermissionSet = PermissionSet::EMPTY
    .with(Permission::CompleteTask)
    .with(Permission::UpdateTask)
    .with(Permission::ViewAllTasks)
    .with(Permission::ExportData);

impl Role {
    /// Every role in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Orchestrator,
        Self::Architect,
        Self::Coder,
        Self::Analyst,
        Self::DevOps,
    ];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Architect => "architect",
            Self::Coder => "coder",
            Self::Analyst => "analyst",
            Self::DevOps => "devops",
        }
    }

    /// Returns a one-line description of the role's responsibilities.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Orchestrator => {
                "Coordinates the team: creates tasks, delegates them, and tracks progress"
            }
            Self::Architect => {
                "Designs system structure and breaks work into implementable tasks"
            }
            Self::Coder => "Implements assigned tasks and reports completion",
            Self::Analyst => "Investigates requirements and data, and raises follow-up tasks",
            Self::DevOps => "Owns builds, deployments, and infrastructure changes",
        }
    }

    /// Returns the permissions granted to this role.
    #[must_use]
    pub const fn permissions(self) -> PermissionSet {
        match self {
            Self::Orchestrator => PermissionSet::ALL,
            Self::Architect => ARCHITECT_PERMISSIONS,
            Self::Coder => CODER_PERMISSIONS,
            Self::Analyst => ANALYST_PERMISSIONS,
            Self::DevOps => DEVOPS_PERMISSIONS,
        }
    }

    /// Returns `true` when this role holds `permission`.
    #[must_use]
    pub const fn has_permission(self, permission: Permission) -> bool {
        self.permissions().contains(permission)
    }

    /// Returns `true` for the coordinating role.
    #[must_use]
    pub const fn is_orchestrator(self) -> bool {
        matches!(self, Self::Orchestrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "orchestrator" => Ok(Self::Orchestrator),
            "architect" => Ok(Self::Architect),
            "coder" => Ok(Self::Coder),
            "analyst" => Ok(Self::Analyst),
            "devops" => Ok(Self::DevOps),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
