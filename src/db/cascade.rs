//! Cascade delete of a task and its completion marks.

use super::completions::Completions;
use super::tasks::Tasks;
use crate::libs::error::{Error, Result};
use crate::libs::task::TaskId;
use rusqlite::Transaction;

/// Rows removed by a cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeReport {
    pub task_id: TaskId,
    pub marks_removed: usize,
}

/// Removes a task and every mark referencing it within `tx`.
///
/// Nothing is visible to other readers until the caller commits. On error the
/// transaction is dropped and rolls back, leaving both tables untouched.
pub fn delete_task_cascade(tx: &Transaction<'_>, task_id: TaskId) -> Result<CascadeReport> {
    let tasks = Tasks::new(tx);
    if !tasks.exists(task_id)? {
        return Err(Error::task_not_found(task_id));
    }

    let marks_removed = Completions::new(tx).delete_all_for_task(task_id)?;
    tasks.delete(task_id)?;

    Ok(CascadeReport { task_id, marks_removed })
}
