//! Board mirror used when no board is configured.

use async_trait::async_trait;

use crate::task::{
    domain::{BoardCardId, Task},
    ports::{BoardMirror, BoardMirrorMode, BoardMirrorResult},
};

/// Board mirror that never creates cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBoardMirror;

#[async_trait]
impl BoardMirror for DisabledBoardMirror {
    fn mode(&self) -> BoardMirrorMode {
        BoardMirrorMode::Disabled
    }

    async fn create_card(&self, _task: &Task) -> BoardMirrorResult<Option<BoardCardId>> {
        Ok(None)
    }

    async fn update_card(&self, _task: &Task) -> BoardMirrorResult<()> {
        Ok(())
    }
}
