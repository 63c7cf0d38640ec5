//! Shared test helpers for in-memory orchestration integration tests.

use baton::task::{
    adapters::memory::{InMemoryBoardMirror, InMemorySnapshotStore},
    domain::Task,
    ports::BoardMirrorMode,
    services::{CreateTaskRequest, OrchestrationResult, OrchestrationService},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Engine type exercised by the in-memory tests.
pub type TestService = OrchestrationService<InMemorySnapshotStore, DefaultClock>;

/// Engine plus handles onto its in-memory adapters.
pub struct Engine {
    /// Engine under test.
    pub service: TestService,
    /// Board mirror observed by assertions.
    pub board: InMemoryBoardMirror,
    /// Snapshot store observed by assertions.
    pub snapshots: InMemorySnapshotStore,
}

impl Engine {
    /// Builds an engine whose board mirror runs in `mode`.
    #[must_use]
    pub fn with_mode(mode: BoardMirrorMode) -> Self {
        let board = InMemoryBoardMirror::with_mode(mode);
        let snapshots = InMemorySnapshotStore::new();
        let service = OrchestrationService::new(
            Arc::new(snapshots.clone()),
            Arc::new(board.clone()),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            board,
            snapshots,
        }
    }
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides an engine without a board mirror.
#[fixture]
pub fn offline() -> Engine {
    Engine::with_mode(BoardMirrorMode::Disabled)
}

/// Provides an engine mirroring to an in-memory board.
#[fixture]
pub fn mirrored() -> Engine {
    Engine::with_mode(BoardMirrorMode::DirectApi)
}

/// Creates a task as the active role.
///
/// # Errors
///
/// Returns the engine error when creation is refused.
pub async fn create_task(
    service: &TestService,
    title: &str,
    dependencies: &[&str],
) -> OrchestrationResult<Task> {
    let request = CreateTaskRequest::new(title, format!("{title} in detail"))
        .with_dependencies(dependencies.iter().map(|dep| (*dep).to_owned()));
    Ok(service.create_task(request).await?.task)
}
