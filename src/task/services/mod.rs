//! Application services for role-gated task orchestration.

mod orchestration;
mod reports;

pub use orchestration::{
    CreateTaskRequest, OrchestrationError, OrchestrationErrorKind, OrchestrationResult,
    OrchestrationService, RECENT_TRANSITIONS,
};
pub use reports::{CardOutcome, CreatedTask, ExportSummary, RoleProfile, StatusReport, SyncReport};
