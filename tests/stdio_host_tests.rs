//! Integration tests for the stdio tool host, using the baton server itself
//! as the child process.

use baton::task::{
    adapters::{StdioToolHost, StdioToolHostConfig},
    ports::{ToolHost, ToolHostError},
};
use eyre::{Result, ensure, eyre};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;

struct ChildServer {
    _data: TempDir,
    host: StdioToolHost,
}

#[fixture]
fn child_server() -> ChildServer {
    let data = tempfile::tempdir().expect("temporary directory");
    let data_dir = data.path().to_str().expect("utf-8 temp path").to_owned();
    let config = StdioToolHostConfig::new(env!("CARGO_BIN_EXE_baton"))
        .with_args([
            "--data-dir".to_owned(),
            data_dir,
            "--board-mode".to_owned(),
            "disabled".to_owned(),
        ])
        .with_timeout(Duration::from_secs(20));
    ChildServer {
        _data: data,
        host: StdioToolHost::new(config),
    }
}

fn first_text(result: &Value) -> Option<&str> {
    result.pointer("/content/0/text").and_then(Value::as_str)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tool_calls_reach_the_child_server(child_server: ChildServer) -> Result<()> {
    let created = child_server
        .host
        .call_tool(
            "create_task",
            json!({ "title": "Design schema", "description": "Tables and keys" }),
        )
        .await?;
    let text = first_text(&created).ok_or_else(|| eyre!("no text in {created}"))?;
    ensure!(text.starts_with("Task TASK-001 created successfully"), "{text}");

    let listed = child_server.host.call_tool("list_tasks", json!({})).await?;
    let listing = first_text(&listed).ok_or_else(|| eyre!("no text in {listed}"))?;
    ensure!(listing.contains("TASK-001: Design schema"), "{listing}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_tools_surface_their_message(child_server: ChildServer) -> Result<()> {
    let result = child_server
        .host
        .call_tool("assign_task", json!({ "task_id": "TASK-404", "role": "coder" }))
        .await;

    match result {
        Err(ToolHostError::ToolFailed { tool, message }) => {
            ensure!(tool == "assign_task");
            ensure!(message.starts_with("Error:"), "{message}");
        }
        other => return Err(eyre!("expected ToolFailed, got {other:?}")),
    }

    let status = child_server.host.call_tool("get_status", Value::Null).await?;
    ensure!(first_text(&status).is_some_and(|text| text.contains("Total Tasks: 0")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tools_are_protocol_errors(child_server: ChildServer) -> Result<()> {
    let result = child_server.host.call_tool("delete_task", json!({})).await;

    ensure!(
        matches!(result, Err(ToolHostError::Protocol { code: -32_602, .. })),
        "expected invalid params, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_executables_fail_to_start() -> Result<()> {
    let host = StdioToolHost::new(StdioToolHostConfig::new("/nonexistent/board-tool-server"));

    let result = host.call_tool("create_card", json!({})).await;

    ensure!(
        matches!(result, Err(ToolHostError::Runtime(_))),
        "expected a spawn failure, got {result:?}"
    );
    Ok(())
}
