//! Identifier types for the task domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequential task identifier rendered as `TASK-NNN`.
///
/// Identifiers order by their numeric suffix, which is also their allocation
/// order within a [`TaskStore`](super::TaskStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(u32);

impl TaskId {
    const PREFIX: &'static str = "TASK-";

    /// Creates an identifier from its sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] when `sequence` is zero.
    pub fn from_sequence(sequence: u32) -> Result<Self, TaskDomainError> {
        if sequence == 0 {
            return Err(TaskDomainError::InvalidTaskId(sequence.to_string()));
        }
        Ok(Self(sequence))
    }

    /// Parses an identifier from its textual form.
    ///
    /// The prefix is matched case-insensitively and surrounding whitespace is
    /// ignored, so `task-7` and `TASK-007` name the same task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] when the value is not a
    /// `TASK-` prefix followed by a positive decimal number.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidTaskId(value.to_owned());
        let normalized = value.trim().to_ascii_uppercase();
        let digits = normalized.strip_prefix(Self::PREFIX).ok_or_else(invalid)?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence = digits.parse::<u32>().map_err(|_| invalid())?;
        Self::from_sequence(sequence).map_err(|_| invalid())
    }

    /// Returns the numeric suffix.
    #[must_use]
    pub const fn sequence(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", Self::PREFIX, self.0)
    }
}

impl FromStr for TaskId {
    type Err = TaskDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.to_string()
    }
}

/// Opaque card identifier owned by the external board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardCardId(String);

impl BoardCardId {
    /// Creates a validated card identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyBoardCardId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyBoardCardId);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BoardCardId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BoardCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
