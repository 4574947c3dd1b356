use crate::libs::completion::{CompletionMark, Toggle};
use crate::libs::day::Day;
use crate::libs::error::Result;
use crate::libs::task::TaskId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_MARK: &str = "INSERT INTO completions (id, date, task_id) VALUES (?1, ?2, ?3)";
const DELETE_MARK: &str = "DELETE FROM completions WHERE id = ?1";
const DELETE_MARKS_BY_TASK: &str = "DELETE FROM completions WHERE task_id = ?1";
const SELECT_MARKS_BY_TASK: &str = "SELECT id, date, task_id FROM completions WHERE task_id = ?1";
const SELECT_MARK_BY_DATE_AND_TASK: &str = "SELECT id, date, task_id FROM completions WHERE date = ?1 AND task_id = ?2 LIMIT 1";
const SELECT_MARKS_BY_DATE: &str = "SELECT id, date, task_id FROM completions WHERE date = ?1";

/// Completion mark repository over a borrowed connection.
pub struct Completions<'c> {
    conn: &'c Connection,
}

impl<'c> Completions<'c> {
    /// Repository over `conn`, which may be a transaction.
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Every mark of a task, in no particular order.
    pub fn list_by_task(&self, task_id: TaskId) -> Result<Vec<CompletionMark>> {
        self.query(SELECT_MARKS_BY_TASK, params![task_id])
    }

    /// Every mark recorded on a day, across tasks.
    pub fn list_by_date(&self, date: Day) -> Result<Vec<CompletionMark>> {
        self.query(SELECT_MARKS_BY_DATE, params![date])
    }

    /// The mark for the `(date, task_id)` pair, if the task was done that day.
    pub fn get_by_date_and_task(&self, date: Day, task_id: TaskId) -> Result<Option<CompletionMark>> {
        self.conn
            .prepare_cached(SELECT_MARK_BY_DATE_AND_TASK)?
            .query_row(params![date, task_id], Self::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Records `task_id` as done on `date`.
    ///
    /// A second mark for the same pair violates the unique index and fails.
    pub fn insert(&self, date: Day, task_id: TaskId) -> Result<CompletionMark> {
        let mark = CompletionMark::new(date, task_id);
        self.conn.execute(INSERT_MARK, params![mark.id, mark.date, mark.task_id])?;
        Ok(mark)
    }

    /// Removes one mark by id and returns the number of rows deleted.
    pub fn delete(&self, mark: &CompletionMark) -> Result<usize> {
        Ok(self.conn.execute(DELETE_MARK, params![mark.id])?)
    }

    /// Inserts a mark for the pair if there is none, otherwise removes it.
    ///
    /// The lookup and the write are two statements; callers must run this
    /// inside a transaction under the store's writer lock.
    pub fn toggle(&self, date: Day, task_id: TaskId) -> Result<Toggle> {
        match self.get_by_date_and_task(date, task_id)? {
            Some(existing) => {
                self.delete(&existing)?;
                Ok(Toggle::Unmarked(existing))
            }
            None => Ok(Toggle::Marked(self.insert(date, task_id)?)),
        }
    }

    /// Removes every mark of `task_id`, returning how many there were.
    pub fn delete_all_for_task(&self, task_id: TaskId) -> Result<usize> {
        Ok(self.conn.execute(DELETE_MARKS_BY_TASK, params![task_id])?)
    }

    /// Runs a mark-returning `SELECT` and collects the rows.
    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<CompletionMark>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mark_iter = stmt.query_map(params, Self::from_row)?;

        let mut marks = Vec::new();
        for mark in mark_iter {
            marks.push(mark?);
        }
        Ok(marks)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<CompletionMark> {
        Ok(CompletionMark {
            id: row.get(0)?,
            date: row.get(1)?,
            task_id: row.get(2)?,
        })
    }
}
