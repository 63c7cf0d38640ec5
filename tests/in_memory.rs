//! In-memory integration tests for the orchestration engine.
//!
//! Tests are organised into modules by functionality:
//! - `workflow_tests`: multi-role task lifecycles through the public API
//! - `board_tests`: board mirror linking, refresh, and sync

mod in_memory {
    pub mod helpers;

    mod board_tests;
    mod workflow_tests;
}
