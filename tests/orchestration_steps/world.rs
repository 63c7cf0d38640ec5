//! Shared world state for orchestration BDD scenarios.

use std::sync::Arc;

use baton::task::{
    adapters::memory::{InMemoryBoardMirror, InMemorySnapshotStore},
    ports::BoardMirrorMode,
    services::{OrchestrationError, OrchestrationService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Engine type used by the BDD world.
pub type TestOrchestrationService = OrchestrationService<InMemorySnapshotStore, DefaultClock>;

/// Scenario world for orchestration behaviour tests.
pub struct OrchestrationWorld {
    pub service: TestOrchestrationService,
    pub snapshots: InMemorySnapshotStore,
    pub last_outcome: Option<Result<(), OrchestrationError>>,
}

impl OrchestrationWorld {
    /// Creates a world around an engine with no board mirror.
    #[must_use]
    pub fn new() -> Self {
        let snapshots = InMemorySnapshotStore::new();
        let service = OrchestrationService::new(
            Arc::new(snapshots.clone()),
            Arc::new(InMemoryBoardMirror::with_mode(BoardMirrorMode::Disabled)),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            snapshots,
            last_outcome: None,
        }
    }

    /// Records the outcome of the step's action.
    pub fn record<T>(&mut self, result: Result<T, OrchestrationError>) {
        self.last_outcome = Some(result.map(|_| ()));
    }
}

impl Default for OrchestrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OrchestrationWorld {
    OrchestrationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
