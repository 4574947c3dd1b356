//! The store: one SQLite connection, one writer at a time, live queries on top.
//!
//! [`Store`] is a cheap-to-clone handle. All access goes through a single
//! `parking_lot::Mutex`, so every mutation runs start to finish (read step,
//! write step, commit, subscription refresh) without interleaving with any
//! other mutation. Subscribers are refreshed before the lock is released,
//! which means each published result reflects exactly one committed state.
//!
//! Everything here is synchronous and quick. Callers on an async runtime go
//! through [`crate::libs::todo::Todo`], which moves each call onto a blocking
//! thread.

use super::cascade::{delete_task_cascade, CascadeReport};
use super::completions::Completions;
use super::db::Db;
use super::tasks::Tasks;
use crate::libs::completion::{CompletionMark, Toggle};
use crate::libs::day::Day;
use crate::libs::error::{Error, Result};
use crate::libs::live::{Change, LiveQuery, Query, Registry};
use crate::libs::task::{Task, TaskId};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::Arc;

/// Everything guarded by the store lock.
struct State {
    /// The only connection to the database file
    db: Db,
    /// Live queries refreshed after each committed write
    registry: Registry,
}

/// Shared handle to the database and its live queries.
///
/// Clones refer to the same connection and lock.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<State>>,
}

impl Store {
    /// Wraps an opened and migrated database.
    pub fn new(db: Db) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                db,
                registry: Registry::default(),
            })),
        }
    }

    /// Opens (or creates) the database at `path` and runs pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Db::open(path)?))
    }

    /// Store over a private in-memory database, gone once the last clone drops.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Db::in_memory()?))
    }

    /// Subscribes to `query`. The returned handle already holds the current result.
    pub fn subscribe<Q: Query>(&self, query: Q) -> Result<LiveQuery<Q::Output>> {
        let mut state = self.state.lock();
        let State { db, registry } = &mut *state;
        registry.register(&db.conn, query)
    }

    /// Number of live queries that still have a receiver.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// One-shot read under the store lock.
    ///
    /// `f` must not call back into the store; the lock is not reentrant.
    pub fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let state = self.state.lock();
        f(&state.db.conn)
    }

    /// Runs `f` in a transaction, commits, then refreshes affected subscriptions.
    ///
    /// If `f` fails the transaction is rolled back and nobody is notified.
    fn write<T>(&self, op: &'static str, f: impl FnOnce(&Transaction<'_>) -> Result<(T, Vec<Change>)>) -> Result<T> {
        let mut state = self.state.lock();
        let State { db, registry } = &mut *state;

        let tx = db.conn.transaction()?;
        let (value, changes) = match f(&tx) {
            Ok(done) => done,
            Err(e) => {
                tracing::debug!(op, error = %e, "write rolled back");
                return Err(e);
            }
        };
        tx.commit()?;

        tracing::debug!(op, changes = changes.len(), "write committed");
        registry.publish(&db.conn, &changes);
        Ok(value)
    }

    /// All tasks in list order.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.read(|conn| Tasks::new(conn).list())
    }

    /// The task with `id`, or `None`.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.read(|conn| Tasks::new(conn).get_by_id(id))
    }

    /// Every mark of `task_id`.
    pub fn list_completions(&self, task_id: TaskId) -> Result<Vec<CompletionMark>> {
        self.read(|conn| Completions::new(conn).list_by_task(task_id))
    }

    /// The mark of `task_id` on `date`, if any.
    pub fn completion_on(&self, date: Day, task_id: TaskId) -> Result<Option<CompletionMark>> {
        self.read(|conn| Completions::new(conn).get_by_date_and_task(date, task_id))
    }

    /// Marks of all tasks on `date`.
    pub fn completions_on_day(&self, date: Day) -> Result<Vec<CompletionMark>> {
        self.read(|conn| Completions::new(conn).list_by_date(date))
    }

    /// Inserts a task with a fresh id and the default order.
    pub fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        self.write("create_task", |tx| {
            let task = Tasks::new(tx).insert(title, description)?;
            let change = Change::Task(task.id);
            Ok((task, vec![change]))
        })
    }

    /// Replaces title and description. Fails with `NotFound` for an unknown id.
    pub fn update_task(&self, id: TaskId, title: &str, description: &str) -> Result<Task> {
        self.write("update_task", |tx| {
            let task = Tasks::new(tx).update(id, title, description)?;
            Ok((task, vec![Change::Task(id)]))
        })
    }

    /// Moves a task by changing its sort key.
    pub fn set_task_order(&self, id: TaskId, order: i64) -> Result<Task> {
        self.write("set_task_order", |tx| {
            let task = Tasks::new(tx).set_order(id, order)?;
            Ok((task, vec![Change::Task(id)]))
        })
    }

    /// Flips the done state of `task_id` on `date` in one transaction.
    pub fn toggle_completion(&self, date: Day, task_id: TaskId) -> Result<Toggle> {
        self.write("toggle_completion", |tx| {
            if !Tasks::new(tx).exists(task_id)? {
                return Err(Error::task_not_found(task_id));
            }
            let toggle = Completions::new(tx).toggle(date, task_id)?;
            Ok((toggle, vec![Change::Completions(task_id)]))
        })
    }

    /// Deletes a task together with all of its completion marks.
    pub fn delete_task_cascade(&self, task_id: TaskId) -> Result<CascadeReport> {
        self.write("delete_task_cascade", |tx| {
            let report = delete_task_cascade(tx, task_id)?;
            Ok((report, vec![Change::Task(task_id), Change::Completions(task_id)]))
        })
    }
}
