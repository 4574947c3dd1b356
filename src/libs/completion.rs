use super::day::Day;
use super::task::TaskId;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkId(Uuid);

impl MarkId {
    pub fn new() -> Self {
        MarkId(Uuid::new_v4())
    }
}

impl Default for MarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for MarkId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for MarkId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Uuid::parse_str(text).map(MarkId).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Record that a task was done on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMark {
    pub id: MarkId,
    pub date: Day,
    pub task_id: TaskId,
}

impl CompletionMark {
    pub fn new(date: Day, task_id: TaskId) -> Self {
        CompletionMark {
            id: MarkId::new(),
            date,
            task_id,
        }
    }
}

/// Result of toggling a (day, task) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// No mark existed; this one was inserted.
    Marked(CompletionMark),
    /// The existing mark was removed.
    Unmarked(CompletionMark),
}

impl Toggle {
    pub fn is_done(&self) -> bool {
        matches!(self, Toggle::Marked(_))
    }

    pub fn mark(&self) -> &CompletionMark {
        match self {
            Toggle::Marked(mark) | Toggle::Unmarked(mark) => mark,
        }
    }
}
