//! Error types shared by the persistence layer, the session controller and
//! the console front-end. Duplicate names are deliberately absent here: they
//! are a normal [`AddOutcome`](crate::roster::AddOutcome), not a failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while talking to the SQLite record store.
/// All variants mean the same thing to the user: storage is unavailable and
/// the operation that triggered it did not happen.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to {action}")]
    Sqlite {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("record store is closed")]
    Closed,
}

impl StoreError {
    pub(crate) fn sqlite(action: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Sqlite { action, source }
    }
}

/// Rejected user input. Validation happens before any entity is built, so a
/// validation error never leaves partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Age is required.")]
    EmptyAge,

    #[error("Age must contain digits only.")]
    NotDigits,

    #[error("Age is too large.")]
    OutOfRange,

    #[error("Age must be a positive number.")]
    NotPositive,

    #[error("Name cannot be empty.")]
    EmptyName,
}

/// Reasons a prompt can end without producing a line.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input interrupted")]
    Interrupted,

    #[error("end of input")]
    EndOfInput,

    #[error("failed to read input")]
    Io(#[from] io::Error),
}

impl PromptError {
    /// Interrupts and a closed input stream both mean "the user is gone" and
    /// trigger the graceful shutdown path.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PromptError::Interrupted | PromptError::EndOfInput)
    }
}
