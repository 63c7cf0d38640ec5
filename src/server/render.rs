//! Plain-text renderings of orchestration results for tool responses.

use crate::task::{
    domain::{RoleTransition, Task},
    ports::BoardMirrorMode,
    services::{
        CardOutcome, CreatedTask, ExportSummary, OrchestrationError, RoleProfile, StatusReport,
        SyncReport,
    },
};

pub(super) fn created(created: &CreatedTask) -> String {
    let location = match &created.card {
        CardOutcome::Linked(card_id) => format!("board card created: {card_id}"),
        CardOutcome::SavedLocally => "saved locally".to_owned(),
    };
    format!(
        "Task {} created successfully: {} ({location})",
        created.task.id(),
        created.task.title()
    )
}

pub(super) fn assigned(task: &Task) -> String {
    let role = task.assigned_role().map_or("unassigned", |role| role.as_str());
    format!("Task {} assigned to {role}", task.id())
}

pub(super) fn completed(task: &Task) -> String {
    format!(
        "Task {} completed, returning control to Orchestrator",
        task.id()
    )
}

pub(super) fn switched(transition: &RoleTransition) -> String {
    format!("Switched to {} role", transition.to_role())
}

pub(super) fn returned(transition: &RoleTransition) -> String {
    format!(
        "Returned control to Orchestrator from {}",
        transition.from_role()
    )
}

pub(super) fn status(report: &StatusReport) -> String {
    let storage = if report.snapshot_present {
        "Available"
    } else {
        "Not available"
    };
    let mut lines = vec![
        format!("Current Role: {}", report.active_role),
        format!("Permissions: {}", report.permissions),
        format!("Total Tasks: {}", report.total_tasks),
        format!("Board Mirror: {}", report.board_mode.label()),
        format!("Local Storage: {storage}"),
        "Tasks by Status:".to_owned(),
    ];
    lines.extend(
        report
            .counts_by_status
            .iter()
            .map(|(task_status, count)| format!("  - {task_status}: {count}")),
    );
    if !report.recent_transitions.is_empty() {
        lines.push(String::new());
        lines.push("Recent Transitions:".to_owned());
        lines.extend(report.recent_transitions.iter().map(|transition| {
            format!(
                "  - {} -> {}: {}",
                transition.from_role(),
                transition.to_role(),
                transition.reason()
            )
        }));
    }
    lines.join("\n")
}

pub(super) fn task_list(tasks: &[Task], filter: Option<&str>, mode: BoardMirrorMode) -> String {
    if tasks.is_empty() {
        return filter
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map_or_else(
                || "No tasks found".to_owned(),
                |raw| format!("No tasks found with status {}", raw.to_ascii_uppercase()),
            );
    }

    let mut lines = vec![format!("Tasks ({} found):", tasks.len())];
    for task in tasks {
        let location = task.board_card_id().map_or_else(
            || "[Local]".to_owned(),
            |card_id| match mode {
                BoardMirrorMode::HostBrokered => format!("[Board via tool server: {card_id}]"),
                BoardMirrorMode::DirectApi | BoardMirrorMode::Disabled => {
                    format!("[Board: {card_id}]")
                }
            },
        );
        lines.push(String::new());
        lines.push(format!("{}: {} {location}", task.id(), task.title()));
        lines.push(format!("  Status: {}", task.status()));
        lines.push(format!(
            "  Assigned to: {}",
            task.assigned_role().map_or("Unassigned", |role| role.as_str())
        ));
        lines.push(format!("  Description: {}", task.description()));
        if !task.dependencies().is_empty() {
            lines.push(format!("  Dependencies: {}", task.dependencies().join(", ")));
        }
    }
    lines.join("\n")
}

pub(super) fn exported(summary: &ExportSummary) -> String {
    format!(
        "Exported {} tasks and {} transitions to local files",
        summary.tasks, summary.transitions
    )
}

fn profile_lines(profile: &RoleProfile) -> Vec<String> {
    let mut lines = vec![format!("{}: {}", profile.role, profile.description)];
    lines.extend(
        profile
            .permissions
            .iter()
            .map(|permission| format!("  - {permission}")),
    );
    lines
}

pub(super) fn role_profile(profile: &RoleProfile) -> String {
    let mut lines = vec![format!("Permissions for the active role ({}):", profile.role)];
    lines.extend(profile_lines(profile));
    lines.join("\n")
}

pub(super) fn role_list(profiles: &[RoleProfile]) -> String {
    profiles
        .iter()
        .map(|profile| profile_lines(profile).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(super) fn synced(report: &SyncReport, mode: BoardMirrorMode) -> String {
    if !mode.is_enabled() {
        return "Board mirror not connected, synced 0 tasks".to_owned();
    }
    format!(
        "Synced {} tasks and refreshed {} cards on the board ({})",
        report.synced,
        report.updated,
        mode.label()
    )
}

pub(super) fn failure(err: &OrchestrationError) -> String {
    format!("Error: {err}")
}

#[cfg(test)]
mod tests {
    use super::{synced, task_list};
    use crate::task::{ports::BoardMirrorMode, services::SyncReport};
    use rstest::rstest;

    #[rstest]
    #[case(None, "No tasks found")]
    #[case(Some("done"), "No tasks found with status DONE")]
    #[case(Some("  "), "No tasks found")]
    fn empty_lists_name_the_filter(#[case] filter: Option<&str>, #[case] expected: &str) {
        assert_eq!(task_list(&[], filter, BoardMirrorMode::Disabled), expected);
    }

    #[rstest]
    fn disabled_sync_reports_zero() {
        let text = synced(&SyncReport::default(), BoardMirrorMode::Disabled);
        assert_eq!(text, "Board mirror not connected, synced 0 tasks");
    }
}
