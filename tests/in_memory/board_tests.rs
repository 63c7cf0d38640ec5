//! Integration tests for board mirror behaviour.

use super::helpers::{Engine, create_task, mirrored, offline, runtime};
use baton::task::{
    domain::TaskStatus,
    ports::BoardMirrorMode,
    services::{CardOutcome, CreateTaskRequest, OrchestrationError},
};
use eyre::{Result, WrapErr, ensure, eyre};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn linked_cards_follow_the_task_through_its_lists(
    runtime: io::Result<Runtime>,
    mirrored: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &mirrored.service;

    let task = rt.block_on(async {
        create_task(service, "Ship it", &[]).await?;
        service.assign_task("TASK-001", "devops").await?;
        service.switch_role("devops", None).await?;
        service.complete_task("TASK-001", Some("deployed")).await
    })?;

    let card_id = task
        .board_card_id()
        .ok_or_else(|| eyre!("task should be linked to a card"))?;
    let card = mirrored
        .board
        .card(card_id)?
        .ok_or_else(|| eyre!("card {card_id} missing from board"))?;
    ensure!(card.list_name == TaskStatus::Done.board_list_name());
    ensure!(mirrored.board.update_count()? == 2);
    Ok(())
}

#[rstest]
fn board_failures_never_fail_the_action(
    runtime: io::Result<Runtime>,
    mirrored: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    mirrored.board.set_failure(Some("board offline"))?;

    let created = rt.block_on(
        mirrored
            .service
            .create_task(CreateTaskRequest::new("Resilient", "Still saved")),
    )?;

    ensure!(created.card == CardOutcome::SavedLocally);
    ensure!(created.task.board_card_id().is_none());
    ensure!(mirrored.snapshots.stored_tasks()?.len() == 1);
    Ok(())
}

#[rstest]
fn sync_creates_missing_cards_and_refreshes_linked_ones(
    runtime: io::Result<Runtime>,
    mirrored: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &mirrored.service;

    let report = rt.block_on(async {
        create_task(service, "Linked", &[]).await?;
        service
            .create_task(
                CreateTaskRequest::new("Local", "Not mirrored yet").with_board_card(false),
            )
            .await?;
        Ok::<_, OrchestrationError>(service.sync_board_mirror().await)
    })?;

    ensure!(report.synced == 1, "expected one new card, got {report:?}");
    ensure!(report.updated == 1, "expected one refreshed card, got {report:?}");
    ensure!(mirrored.board.card_count()? == 2);
    let local = rt.block_on(service.get_task("TASK-002"))?;
    ensure!(local.board_card_id().is_some());
    Ok(())
}

#[rstest]
fn disabled_mirror_reports_its_mode_and_syncs_nothing(
    runtime: io::Result<Runtime>,
    offline: Engine,
) -> Result<()> {
    let rt = runtime.wrap_err("create runtime")?;
    let service = &offline.service;

    let report = rt.block_on(async {
        create_task(service, "Local only", &[]).await?;
        Ok::<_, OrchestrationError>(service.sync_board_mirror().await)
    })?;

    ensure!(service.board_mode() == BoardMirrorMode::Disabled);
    ensure!(report.synced == 0 && report.updated == 0);
    ensure!(offline.board.card_count()? == 0);
    Ok(())
}
