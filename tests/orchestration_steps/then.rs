//! Then steps for orchestration BDD scenarios.

use super::world::{OrchestrationWorld, run_async};
use baton::task::{
    domain::{Role, TaskStatus},
    services::OrchestrationErrorKind,
};
use rstest_bdd_macros::then;

fn parse_kind(raw: &str) -> Result<OrchestrationErrorKind, eyre::Report> {
    match raw {
        "PermissionDenied" => Ok(OrchestrationErrorKind::PermissionDenied),
        "NotFound" => Ok(OrchestrationErrorKind::NotFound),
        "InvalidArgument" => Ok(OrchestrationErrorKind::InvalidArgument),
        "DependencyBlocked" => Ok(OrchestrationErrorKind::DependencyBlocked),
        "InvalidState" => Ok(OrchestrationErrorKind::InvalidState),
        "Storage" => Ok(OrchestrationErrorKind::Storage),
        other => Err(eyre::eyre!("unknown error kind in scenario: {other}")),
    }
}

#[then(r#"task "{task_id}" has status "{status}""#)]
fn task_has_status(
    world: &OrchestrationWorld,
    task_id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = run_async(world.service.get_task(&task_id))?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected {task_id} to be {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the active role is "{role}""#)]
fn active_role_is(world: &OrchestrationWorld, role: String) -> Result<(), eyre::Report> {
    let expected = Role::try_from(role.as_str())
        .map_err(|err| eyre::eyre!("invalid expected role in scenario: {err}"))?;
    let active = run_async(world.service.current_role());

    if active != expected {
        return Err(eyre::eyre!("expected active role {expected}, found {active}"));
    }
    Ok(())
}

#[then(r#"the action is refused with "{kind}""#)]
fn action_refused_with(world: &OrchestrationWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = parse_kind(&kind)?;
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no action was attempted"))?;

    match outcome {
        Err(err) if err.kind() == expected => Ok(()),
        other => Err(eyre::eyre!("expected a {kind} refusal, got {other:?}")),
    }
}

#[then(r#"the latest transition reads "{reason}""#)]
fn latest_transition_reads(world: &OrchestrationWorld, reason: String) -> Result<(), eyre::Report> {
    let transitions = world.snapshots.stored_transitions()?;
    let latest = transitions
        .last()
        .ok_or_else(|| eyre::eyre!("no transitions were recorded"))?;

    if latest.reason() != reason {
        return Err(eyre::eyre!(
            "expected latest transition {reason:?}, found {:?}",
            latest.reason()
        ));
    }
    Ok(())
}
