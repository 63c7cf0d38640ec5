//! In-memory board mirror for orchestration tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    adapters::board::{CardContent, CardStage},
    domain::{BoardCardId, Task},
    ports::{BoardMirror, BoardMirrorError, BoardMirrorMode, BoardMirrorResult},
};

/// Card as last written to the in-memory board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCard {
    /// Card title.
    pub name: String,
    /// Card body.
    pub description: String,
    /// List the card sits in.
    pub list_name: String,
}

/// Thread-safe in-memory board mirror.
///
/// Reports a configurable mode, stores cards keyed by generated identifiers,
/// and can be switched into a failing mode to exercise fail-soft mirroring.
#[derive(Debug, Clone)]
pub struct InMemoryBoardMirror {
    mode: BoardMirrorMode,
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    cards: BTreeMap<String, RecordedCard>,
    next_card: u64,
    updates: usize,
    failure: Option<String>,
}

fn lock_error(err: impl std::fmt::Display) -> BoardMirrorError {
    BoardMirrorError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryBoardMirror {
    /// Creates an empty board reporting [`BoardMirrorMode::DirectApi`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(BoardMirrorMode::DirectApi)
    }

    /// Creates an empty board reporting `mode`.
    #[must_use]
    pub fn with_mode(mode: BoardMirrorMode) -> Self {
        Self {
            mode,
            state: Arc::new(RwLock::new(InMemoryBoardState::default())),
        }
    }

    /// Makes every subsequent call fail with `message`, or succeed again
    /// when `None`.
    ///
    /// # Errors
    ///
    /// Returns board mirror errors when lock acquisition fails.
    pub fn set_failure(&self, message: Option<&str>) -> BoardMirrorResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.failure = message.map(str::to_owned);
        Ok(())
    }

    /// Returns the card stored under `card_id`.
    ///
    /// # Errors
    ///
    /// Returns board mirror errors when lock acquisition fails.
    pub fn card(&self, card_id: &BoardCardId) -> BoardMirrorResult<Option<RecordedCard>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.cards.get(card_id.as_str()).cloned())
    }

    /// Returns the number of cards on the board.
    ///
    /// # Errors
    ///
    /// Returns board mirror errors when lock acquisition fails.
    pub fn card_count(&self) -> BoardMirrorResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.cards.len())
    }

    /// Returns the number of successful card updates.
    ///
    /// # Errors
    ///
    /// Returns board mirror errors when lock acquisition fails.
    pub fn update_count(&self) -> BoardMirrorResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.updates)
    }
}

impl Default for InMemoryBoardMirror {
    fn default() -> Self {
        Self::new()
    }
}

fn check_available(state: &InMemoryBoardState) -> BoardMirrorResult<()> {
    state.failure.as_ref().map_or(Ok(()), |message| {
        Err(BoardMirrorError::transport(std::io::Error::other(
            message.clone(),
        )))
    })
}

#[async_trait]
impl BoardMirror for InMemoryBoardMirror {
    fn mode(&self) -> BoardMirrorMode {
        self.mode
    }

    async fn create_card(&self, task: &Task) -> BoardMirrorResult<Option<BoardCardId>> {
        if !self.mode.is_enabled() {
            return Ok(None);
        }
        let content = CardContent::for_task(task, CardStage::Created)?;
        let mut state = self.state.write().map_err(lock_error)?;
        check_available(&state)?;

        state.next_card += 1;
        let card_id = BoardCardId::new(format!("card-{}", state.next_card))
            .map_err(|err| BoardMirrorError::UnexpectedResponse(err.to_string()))?;
        state.cards.insert(
            card_id.as_str().to_owned(),
            RecordedCard {
                name: content.name,
                description: content.description,
                list_name: content.list_name.to_owned(),
            },
        );
        Ok(Some(card_id))
    }

    async fn update_card(&self, task: &Task) -> BoardMirrorResult<()> {
        let Some(card_id) = task.board_card_id() else {
            return Ok(());
        };
        let content = CardContent::for_task(task, CardStage::Updated)?;
        let mut state = self.state.write().map_err(lock_error)?;
        check_available(&state)?;

        let card = state
            .cards
            .get_mut(card_id.as_str())
            .ok_or_else(|| BoardMirrorError::UnexpectedResponse(format!("unknown card {card_id}")))?;
        card.description = content.description;
        content.list_name.clone_into(&mut card.list_name);
        state.updates += 1;
        Ok(())
    }
}
