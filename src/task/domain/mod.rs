//! Domain model for role-gated task orchestration.
//!
//! Roles and their permissions, the task aggregate, the task store that
//! allocates sequential identifiers, and the append-only transition log. No
//! infrastructure concerns cross this boundary.

mod error;
mod ids;
mod permission;
mod role;
mod status;
mod store;
mod task;
mod transition;

pub use error::{ParseRoleError, ParseTaskStatusError, TaskDomainError};
pub use ids::{BoardCardId, TaskId};
pub use permission::{Permission, PermissionSet, permissions_for_name};
pub use role::Role;
pub use status::TaskStatus;
pub use store::{TaskStore, TaskStoreError};
pub use task::{NewTask, Task, TaskComment};
pub use transition::{RoleTransition, TransitionLog};
