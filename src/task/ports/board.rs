//! Board mirror port for best-effort synchronisation with a kanban board.

use crate::task::domain::{BoardCardId, Task};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board mirror operations.
pub type BoardMirrorResult<T> = Result<T, BoardMirrorError>;

/// How the mirror reaches the external board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardMirrorMode {
    /// No board is connected; every call is a no-op.
    Disabled,
    /// The board's REST API is called directly.
    DirectApi,
    /// Calls are brokered through a board tool server.
    HostBrokered,
}

impl BoardMirrorMode {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::DirectApi => "direct_api",
            Self::HostBrokered => "host_brokered",
        }
    }

    /// Returns a human-readable connectivity label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "Not connected",
            Self::DirectApi => "Direct API",
            Self::HostBrokered => "Host-brokered tool server",
        }
    }

    /// Returns `true` when a board is connected.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl fmt::Display for BoardMirrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External board synchronisation contract.
///
/// Callers treat every error as non-fatal: the local task store stays the
/// source of truth.
#[async_trait]
pub trait BoardMirror: Send + Sync {
    /// Reports how this mirror reaches the board.
    fn mode(&self) -> BoardMirrorMode;

    /// Creates a card for `task`, returning its identifier.
    ///
    /// Returns `Ok(None)` when the mirror is disabled or the board accepted
    /// the request without reporting an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardMirrorError`] when the board cannot be reached or
    /// rejects the card.
    async fn create_card(&self, task: &Task) -> BoardMirrorResult<Option<BoardCardId>>;

    /// Refreshes the card linked to `task`.
    ///
    /// Tasks without a linked card are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BoardMirrorError`] when the board cannot be reached or
    /// rejects the update.
    async fn update_card(&self, task: &Task) -> BoardMirrorResult<()>;
}

/// Errors returned by board mirror implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardMirrorError {
    /// The configured board does not exist or is not visible.
    #[error("board {0} not found")]
    BoardNotFound(String),

    /// The board answered with a non-success status.
    #[error("board request failed with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The board's answer could not be interpreted.
    #[error("unexpected board response: {0}")]
    UnexpectedResponse(String),

    /// Rendering card content failed.
    #[error("failed to render card content: {0}")]
    Render(String),

    /// Transport-level failure.
    #[error("board transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardMirrorError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
