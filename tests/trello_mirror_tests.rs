//! Integration tests for the direct Trello board mirror against a local
//! HTTP stub.

use baton::task::{
    adapters::board::{TrelloBoardMirror, TrelloConfig},
    domain::{NewTask, Role, TaskStore},
    ports::{BoardMirror, BoardMirrorError, BoardMirrorMode},
};
use eyre::{Result, WrapErr, ensure, eyre};
use mockable::DefaultClock;
use rstest::rstest;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response per entry, in order, then stops. Returns the
/// base URL and a handle yielding the request lines received.
async fn stub_trello(responses: Vec<(u16, String)>) -> Result<(String, JoinHandle<Vec<String>>)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .wrap_err("bind stub listener")?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let mut request_lines = Vec::new();
        for (status, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buffer = vec![0_u8; 8192];
            let read = socket.read(&mut buffer).await.unwrap_or(0);
            let request = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default());
            request_lines.push(request.lines().next().unwrap_or_default().to_owned());

            let reply = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            if socket.write_all(reply.as_bytes()).await.is_err() {
                break;
            }
            socket.shutdown().await.ok();
        }
        request_lines
    });
    Ok((base_url, handle))
}

fn config(base_url: &str, board_id: &str) -> TrelloConfig {
    TrelloConfig::new("key", "token", board_id)
        .with_api_url(base_url)
        .with_timeout(Duration::from_secs(5))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_verifies_the_working_board() -> Result<()> {
    let (base_url, requests) =
        stub_trello(vec![(200, r#"{"id":"board-1","name":"Work"}"#.to_owned())]).await?;

    let mirror = TrelloBoardMirror::connect(config(&base_url, "board-1")).await?;

    ensure!(mirror.mode() == BoardMirrorMode::DirectApi);
    let seen = requests.await?;
    let first = seen.first().ok_or_else(|| eyre!("no request reached the stub"))?;
    ensure!(first.starts_with("GET /1/boards/board-1?"), "{first}");
    ensure!(first.contains("key=key") && first.contains("token=token"), "{first}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_boards_are_reported_by_identifier() -> Result<()> {
    let (base_url, _requests) =
        stub_trello(vec![(404, r#""board not found""#.to_owned())]).await?;

    let result = TrelloBoardMirror::connect(config(&base_url, "nope")).await;

    ensure!(
        matches!(&result, Err(BoardMirrorError::BoardNotFound(board)) if board == "nope"),
        "expected BoardNotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_api_is_a_transport_error() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let result = TrelloBoardMirror::connect(config(&base_url, "board-1")).await;

    ensure!(
        matches!(result, Err(BoardMirrorError::Transport(_))),
        "expected a transport error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cards_are_created_in_the_todo_list() -> Result<()> {
    let (base_url, requests) = stub_trello(vec![
        (200, r#"{"id":"board-1","name":"Work"}"#.to_owned()),
        (200, r#"[{"id":"list-todo","name":"To Do"}]"#.to_owned()),
        (200, r#"{"id":"card-9","idList":"list-todo"}"#.to_owned()),
    ])
    .await?;
    let mirror = TrelloBoardMirror::connect(config(&base_url, "board-1")).await?;
    let mut store = TaskStore::new();
    let task = store.create_task(
        NewTask::new("Design schema", "Tables and keys", Role::Orchestrator)?,
        &DefaultClock,
    )?;

    let card_id = mirror
        .create_card(&task)
        .await?
        .ok_or_else(|| eyre!("Trello returned no card"))?;

    ensure!(card_id.as_str() == "card-9");
    let seen = requests.await?;
    let post = seen.get(2).ok_or_else(|| eyre!("card was never posted: {seen:?}"))?;
    ensure!(post.starts_with("POST /1/cards?"), "{post}");
    ensure!(post.contains("idList=list-todo"), "{post}");
    Ok(())
}
