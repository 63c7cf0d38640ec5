//! Tests for the static role-to-permission table.

use crate::task::domain::{Permission, PermissionSet, Role, permissions_for_name};
use rstest::rstest;

#[rstest]
#[case(Role::Orchestrator, &Permission::ALL)]
#[case(
    Role::Architect,
    &[
        Permission::CreateTask,
        Permission::AssignTask,
        Permission::CompleteTask,
        Permission::UpdateTask,
        Permission::ViewAllTasks,
        Permission::ExportData,
    ]
)]
#[case(
    Role::Coder,
    &[Permission::CompleteTask, Permission::UpdateTask, Permission::ViewAllTasks]
)]
#[case(
    Role::Analyst,
    &[
        Permission::CreateTask,
        Permission::CompleteTask,
        Permission::UpdateTask,
        Permission::ViewAllTasks,
        Permission::ExportData,
    ]
)]
#[case(
    Role::DevOps,
    &[
        Permission::CompleteTask,
        Permission::UpdateTask,
        Permission::ViewAllTasks,
        Permission::ExportData,
    ]
)]
fn role_permissions_match_the_table(#[case] role: Role, #[case] granted: &[Permission]) {
    for permission in Permission::ALL {
        assert_eq!(
            role.has_permission(permission),
            granted.contains(&permission),
            "{role} / {permission}"
        );
    }
    assert_eq!(role.permissions().len(), granted.len());
}

#[rstest]
fn only_the_orchestrator_may_switch_roles() {
    let switchers: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|role| role.has_permission(Permission::SwitchRole))
        .collect();
    assert_eq!(switchers, vec![Role::Orchestrator]);
}

#[rstest]
#[case("architect", Role::Architect.permissions())]
#[case(" DevOps ", Role::DevOps.permissions())]
#[case("auditor", PermissionSet::EMPTY)]
#[case("", PermissionSet::EMPTY)]
fn permissions_are_looked_up_by_name(#[case] name: &str, #[case] expected: PermissionSet) {
    assert_eq!(permissions_for_name(name), expected);
}

#[rstest]
fn permission_sets_iterate_in_declaration_order() {
    let set: PermissionSet = [Permission::ExportData, Permission::CreateTask]
        .into_iter()
        .collect();
    let names: Vec<&str> = set.iter().map(Permission::as_str).collect();
    assert_eq!(names, vec!["create_task", "export_data"]);
    assert_eq!(set.to_string(), "create_task, export_data");
}

#[rstest]
fn permission_sets_serialise_as_name_lists() {
    let encoded = serde_json::to_value(Role::Coder.permissions()).expect("set should serialise");
    assert_eq!(
        encoded,
        serde_json::json!(["complete_task", "update_task", "view_all_tasks"])
    );
}

#[rstest]
fn permission_names_are_unique_snake_case() {
    let names: std::collections::BTreeSet<&str> =
        Permission::ALL.into_iter().map(Permission::as_str).collect();
    assert_eq!(names.len(), Permission::ALL.len());
    for permission in Permission::ALL {
        assert_eq!(
            serde_json::to_value(permission).expect("encode"),
            serde_json::json!(permission.as_str())
        );
    }
}

#[rstest]
fn every_role_has_a_description() {
    assert!(Role::ALL.iter().all(|role| !role.description().is_empty()));
    assert_eq!(
        Role::Architect.description(),
        "Designs system structure and breaks work into implementable tasks"
    );
}
