use crate::libs::error::{Error, Result};
use crate::libs::task::{Task, TaskId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_TASK: &str = "INSERT INTO tasks (id, \"order\", title, description) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_TASK: &str = "UPDATE tasks SET title = ?2, description = ?3 WHERE id = ?1";
const UPDATE_ORDER: &str = "UPDATE tasks SET \"order\" = ?2 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const SELECT_TASKS: &str = "SELECT id, \"order\", title, description FROM tasks ORDER BY \"order\" ASC, rowid ASC";
const SELECT_TASK_BY_ID: &str = "SELECT id, \"order\", title, description FROM tasks WHERE id = ?1";
const TASK_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)";

/// Task repository over a borrowed connection.
///
/// Works the same on a plain connection and inside a transaction, which
/// derefs to `Connection`.
pub struct Tasks<'c> {
    conn: &'c Connection,
}

impl<'c> Tasks<'c> {
    /// Repository over `conn`, which may be a transaction.
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// All tasks, ascending by `order`, ties in insertion order.
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare_cached(SELECT_TASKS)?;
        let task_iter = stmt.query_map([], Self::from_row)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    /// The task with `id`, or `None` when there is no such row.
    pub fn get_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        self.conn
            .prepare_cached(SELECT_TASK_BY_ID)?
            .query_row(params![id], Self::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Whether a task with `id` is stored.
    pub fn exists(&self, id: TaskId) -> Result<bool> {
        Ok(self.conn.query_row(TASK_EXISTS, params![id], |row| row.get(0))?)
    }

    /// Inserts a new task with a fresh id and the default order.
    pub fn insert(&self, title: &str, description: &str) -> Result<Task> {
        let task = Task::new(title, description);
        self.conn
            .execute(INSERT_TASK, params![task.id, task.order, task.title, task.description])?;
        Ok(task)
    }

    /// Replaces title and description of an existing task.
    pub fn update(&self, id: TaskId, title: &str, description: &str) -> Result<Task> {
        let affected = self.conn.execute(UPDATE_TASK, params![id, title, description])?;
        if affected == 0 {
            return Err(Error::task_not_found(id));
        }
        self.get_by_id(id)?.ok_or_else(|| Error::task_not_found(id))
    }

    /// Changes the sort key of an existing task and returns the updated row.
    ///
    /// Fails with `NotFound` when `id` does not exist.
    pub fn set_order(&self, id: TaskId, order: i64) -> Result<Task> {
        let affected = self.conn.execute(UPDATE_ORDER, params![id, order])?;
        if affected == 0 {
            return Err(Error::task_not_found(id));
        }
        self.get_by_id(id)?.ok_or_else(|| Error::task_not_found(id))
    }

    /// Removes the task row only. Use [`super::cascade::delete_task_cascade`]
    /// to take its completion marks with it.
    pub fn delete(&self, id: TaskId) -> Result<usize> {
        Ok(self.conn.execute(DELETE_TASK, params![id])?)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            order: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
        })
    }
}
