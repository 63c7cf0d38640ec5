//! Integration tests for board mirroring brokered through a tool host.

use baton::task::{
    adapters::{
        board::{BrokeredBoardMirror, CREATE_CARD_TOOL, UPDATE_CARD_TOOL},
        memory::{InMemorySnapshotStore, InMemoryToolHost},
    },
    ports::BoardMirrorMode,
    services::{CardOutcome, CreateTaskRequest, OrchestrationService},
};
use eyre::{Result, ensure, eyre};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

struct Brokered {
    host: InMemoryToolHost,
    service: OrchestrationService<InMemorySnapshotStore, DefaultClock>,
}

#[fixture]
fn brokered() -> Brokered {
    let host = InMemoryToolHost::new();
    let service = OrchestrationService::new(
        Arc::new(InMemorySnapshotStore::new()),
        Arc::new(BrokeredBoardMirror::new(Arc::new(host.clone()))),
        Arc::new(DefaultClock),
    );
    Brokered { host, service }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_cards_are_linked_from_tool_results(brokered: Brokered) -> Result<()> {
    brokered.host.set_result(
        CREATE_CARD_TOOL,
        json!({ "content": [{ "type": "text", "text": "{\"id\": \"abc123\"}" }] }),
    )?;

    let created = brokered
        .service
        .create_task(CreateTaskRequest::new("Design schema", "Tables and keys"))
        .await?;

    ensure!(brokered.service.board_mode() == BoardMirrorMode::HostBrokered);
    let CardOutcome::Linked(card_id) = &created.card else {
        return Err(eyre!("expected a linked card, got {:?}", created.card));
    };
    ensure!(card_id.as_str() == "abc123");

    let calls = brokered.host.calls()?;
    let first = calls.first().ok_or_else(|| eyre!("no tool call made"))?;
    ensure!(first.tool == CREATE_CARD_TOOL);
    ensure!(first.arguments["name"] == "TASK-001: Design schema");
    ensure!(first.arguments["list_name"] == "To Do");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignment_moves_the_brokered_card(brokered: Brokered) -> Result<()> {
    brokered
        .host
        .set_result(CREATE_CARD_TOOL, json!({ "structuredContent": { "id": "abc123" } }))?;
    brokered
        .service
        .create_task(CreateTaskRequest::new("Design schema", "Tables and keys"))
        .await?;

    brokered.service.assign_task("TASK-001", "architect").await?;

    let calls = brokered.host.calls()?;
    let update = calls
        .iter()
        .find(|call| call.tool == UPDATE_CARD_TOOL)
        .ok_or_else(|| eyre!("no update call in {calls:?}"))?;
    ensure!(update.arguments["card_id"] == "abc123");
    ensure!(update.arguments["list_name"] == "In Progress");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unparseable_results_leave_the_task_local(brokered: Brokered) -> Result<()> {
    brokered.host.set_result(
        CREATE_CARD_TOOL,
        json!({ "content": [{ "type": "text", "text": "Card created successfully" }] }),
    )?;

    let created = brokered
        .service
        .create_task(CreateTaskRequest::new("Design schema", "Tables and keys"))
        .await?;

    ensure!(created.card == CardOutcome::SavedLocally);
    ensure!(created.task.board_card_id().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tool_failures_do_not_fail_the_action(brokered: Brokered) -> Result<()> {
    brokered.host.set_failure(CREATE_CARD_TOOL, "board tool unavailable")?;

    let created = brokered
        .service
        .create_task(CreateTaskRequest::new("Design schema", "Tables and keys"))
        .await?;

    ensure!(created.card == CardOutcome::SavedLocally);
    ensure!(brokered.service.list_tasks(None).await?.len() == 1);
    Ok(())
}
