//! Integration tests for multi-role task lifecycles.
//!
//! Each test drives the engine the way an MCP client would: the
//! orchestrator plans, hands over to a specialist, and control comes back
//! when the work is done.

use super::helpers::{Engine, create_task, offline, runtime};
use baton::task::{
    domain::{Role, TaskStatus},
    services::{OrchestrationError, OrchestrationErrorKind},
};
use eyre::{Result, WrapErr, ensure, eyre};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn dependent_work_unblocks_once_its_dependency_is_done(
    runtime: io::Result<Runtime>,
    offline: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &offline.service;

    rt.block_on(async {
        create_task(service, "Design schema", &[]).await?;
        create_task(service, "Implement schema", &["TASK-001"]).await?;

        let blocked = service.assign_task("TASK-002", "coder").await;
        ensure!(
            matches!(blocked, Err(OrchestrationError::DependencyBlocked { .. })),
            "expected a dependency block, got {blocked:?}"
        );

        service.assign_task("TASK-001", "architect").await?;
        service.switch_role("architect", Some("design work")).await?;
        service.complete_task("TASK-001", Some("schema agreed")).await?;

        let implementation = service.assign_task("TASK-002", "coder").await?;
        ensure!(implementation.status() == TaskStatus::InProgress);
        ensure!(implementation.assigned_role() == Some(Role::Coder));
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn the_transition_log_tells_the_whole_story(
    runtime: io::Result<Runtime>,
    offline: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &offline.service;

    rt.block_on(async {
        create_task(service, "Write docs", &[]).await?;
        service.assign_task("TASK-001", "analyst").await?;
        service.switch_role("analyst", None).await?;
        service.complete_task("TASK-001", None).await?;
        Ok::<(), OrchestrationError>(())
    })?;

    let reasons: Vec<String> = offline
        .snapshots
        .stored_transitions()?
        .iter()
        .map(|transition| transition.reason().to_owned())
        .collect();
    ensure!(
        reasons
            == vec![
                "Task TASK-001 assigned to analyst".to_owned(),
                "Switching to analyst role".to_owned(),
                "Task TASK-001 completed by analyst".to_owned(),
            ],
        "unexpected transition reasons: {reasons:?}"
    );
    Ok(())
}

#[rstest]
fn specialists_cannot_hand_over_to_each_other(
    runtime: io::Result<Runtime>,
    offline: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &offline.service;

    rt.block_on(async {
        service.switch_role("coder", None).await?;
        let refused = service
            .switch_role("devops", None)
            .await
            .err()
            .ok_or_else(|| eyre!("coder should not switch directly to devops"))?;
        ensure!(refused.kind() == OrchestrationErrorKind::PermissionDenied);

        let back = service.return_to_orchestrator(None).await?;
        ensure!(back.from_role() == Role::Coder);
        ensure!(back.reason() == "Returning control to Orchestrator");

        let again = service.return_to_orchestrator(None).await;
        ensure!(
            matches!(again, Err(OrchestrationError::AlreadyOrchestrator)),
            "expected AlreadyOrchestrator, got {again:?}"
        );
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn status_counts_every_status_and_recent_transitions(
    runtime: io::Result<Runtime>,
    offline: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &offline.service;

    let report = rt.block_on(async {
        for title in ["one", "two", "three"] {
            create_task(service, title, &[]).await?;
        }
        service.assign_task("TASK-002", "devops").await?;
        for _ in 0..4 {
            service.switch_role("coder", None).await?;
            service.return_to_orchestrator(None).await?;
        }
        Ok::<_, OrchestrationError>(service.status().await)
    })?;

    ensure!(report.active_role == Role::Orchestrator);
    ensure!(report.total_tasks == 3);
    ensure!(report.counts_by_status.len() == TaskStatus::ALL.len());
    let in_progress = report
        .counts_by_status
        .iter()
        .find(|(task_status, _)| *task_status == TaskStatus::InProgress)
        .map(|(_, count)| *count);
    ensure!(in_progress == Some(1));
    ensure!(report.recent_transitions.len() == 5);
    ensure!(report.snapshot_present);
    Ok(())
}

#[rstest]
fn list_tasks_rejects_unknown_status_filters(
    runtime: io::Result<Runtime>,
    offline: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &offline.service;

    rt.block_on(async {
        create_task(service, "one", &[]).await?;
        let done = service.list_tasks(Some("DONE")).await?;
        ensure!(done.is_empty());
        let all = service.list_tasks(Some("")).await?;
        ensure!(all.len() == 1);
        let err = service
            .list_tasks(Some("archived"))
            .await
            .err()
            .ok_or_else(|| eyre!("unknown status must be rejected"))?;
        ensure!(err.kind() == OrchestrationErrorKind::InvalidArgument);
        Ok::<(), eyre::Report>(())
    })
}
