//! Error types for the storage and domain layer.
//!
//! Every fallible operation in [`crate::db`] and the async facade returns
//! [`Result`]. Command handlers convert these into `anyhow::Error` with `?`.

use std::fmt;

/// Kind of record an id refers to, used in [`Error::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Task,
    PendingDelete,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Task => write!(f, "task"),
            RecordKind::PendingDelete => write!(f, "pending delete"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation referenced an id that does not exist.
    ///
    /// Callers normally only pass ids they got from a listing, so this is a
    /// logic error rather than something to show the user.
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: String },

    /// I/O or constraint failure reported by SQLite.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A blocking storage job panicked or was cancelled.
    #[error("background job failed: {0}")]
    Background(#[from] tokio::task::JoinError),

    /// The store behind a live query has been dropped.
    #[error("store closed")]
    Closed,
}

impl Error {
    pub fn task_not_found(id: impl ToString) -> Self {
        Error::NotFound {
            kind: RecordKind::Task,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
