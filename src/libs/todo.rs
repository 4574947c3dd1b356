//! Async entry point used by the presentation layer.
//!
//! [`Todo`] wraps a [`Store`] and a [`DeferredDeletes`] queue. Each store call
//! is moved onto tokio's blocking pool, so awaiting any method never stalls
//! the caller's executor thread on SQLite I/O. Queries come back as
//! [`LiveQuery`] handles that keep updating after the call returns.
//!
//! ```rust,no_run
//! use doneday::db::store::Store;
//! use doneday::libs::{day::Day, todo::Todo};
//! use std::time::Duration;
//!
//! # async fn demo() -> doneday::libs::error::Result<()> {
//! let todo = Todo::new(Store::in_memory()?, Duration::from_secs(10));
//! let id = todo.create_task("Buy milk", "").await?;
//! let done = todo.is_done(Day::today(), id).await?;
//!
//! todo.toggle_completion(Day::today(), id).await?;
//! assert!(done.snapshot().is_some());
//!
//! todo.shutdown().await;
//! # Ok(())
//! # }
//! ```

use super::completion::{CompletionMark, Toggle};
use super::config::Config;
use super::day::Day;
use super::deferred::{DeferredDeletes, DeleteState, PendingDelete};
use super::error::Result;
use super::live::LiveQuery;
use super::stats::CompletionStats;
use super::task::{Task, TaskId};
use crate::db::db::Db;
use crate::db::queries::{AllTasks, CompletionOn, CompletionsForTask, CompletionsOnDay, TaskById};
use crate::db::store::Store;
use std::time::Duration;

#[derive(Clone)]
pub struct Todo {
    store: Store,
    deletes: DeferredDeletes,
}

impl Todo {
    pub fn new(store: Store, undo_window: Duration) -> Self {
        let deletes = DeferredDeletes::new(store.clone(), undo_window);
        Self { store, deletes }
    }

    /// Opens the configured database in the application data directory.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let db = Db::new(&config.db_file())?;
        Ok(Self::new(Store::new(db), config.undo_window()))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn deletes(&self) -> &DeferredDeletes {
        &self.deletes
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store)).await?
    }

    /// Every task in list order, including ones with a pending delete.
    pub async fn list_tasks(&self) -> Result<LiveQuery<Vec<Task>>> {
        self.blocking(|store| store.subscribe(AllTasks)).await
    }

    /// Current task list minus tasks waiting to be deleted.
    pub async fn visible_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = self.blocking(|store| store.list_tasks()).await?;
        self.deletes.retain_visible(&mut tasks);
        Ok(tasks)
    }

    pub async fn get_task(&self, id: TaskId) -> Result<LiveQuery<Option<Task>>> {
        self.blocking(move |store| store.subscribe(TaskById(id))).await
    }

    pub async fn create_task(&self, title: &str, description: &str) -> Result<TaskId> {
        let (title, description) = (title.to_string(), description.to_string());
        let task = self.blocking(move |store| store.create_task(&title, &description)).await?;
        Ok(task.id)
    }

    /// Fails with `NotFound` when `id` does not exist.
    pub async fn update_task(&self, id: TaskId, title: &str, description: &str) -> Result<Task> {
        let (title, description) = (title.to_string(), description.to_string());
        self.blocking(move |store| store.update_task(id, &title, &description)).await
    }

    pub async fn set_task_order(&self, id: TaskId, order: i64) -> Result<Task> {
        self.blocking(move |store| store.set_task_order(id, order)).await
    }

    pub async fn request_delete_task(&self, id: TaskId) -> Result<PendingDelete> {
        self.deletes.request(id).await
    }

    pub async fn confirm_delete(&self, id: TaskId) -> Result<DeleteState> {
        self.deletes.confirm(id).await
    }

    pub async fn cancel_delete(&self, id: TaskId) -> Result<DeleteState> {
        self.deletes.cancel(id).await
    }

    pub async fn list_completions(&self, task_id: TaskId) -> Result<LiveQuery<Vec<CompletionMark>>> {
        self.blocking(move |store| store.subscribe(CompletionsForTask(task_id))).await
    }

    pub async fn completions_on_day(&self, date: Day) -> Result<LiveQuery<Vec<CompletionMark>>> {
        self.blocking(move |store| store.subscribe(CompletionsOnDay(date))).await
    }

    /// Present while `task_id` is marked done on `date`.
    pub async fn is_done(&self, date: Day, task_id: TaskId) -> Result<LiveQuery<Option<CompletionMark>>> {
        self.blocking(move |store| store.subscribe(CompletionOn { date, task_id })).await
    }

    pub async fn toggle_completion(&self, date: Day, task_id: TaskId) -> Result<Toggle> {
        self.blocking(move |store| store.toggle_completion(date, task_id)).await
    }

    pub async fn statistics(&self, task_id: TaskId, reference: Day) -> Result<CompletionStats> {
        let marks = self.blocking(move |store| store.list_completions(task_id)).await?;
        Ok(CompletionStats::from_marks(&marks, reference))
    }

    /// Applies pending deletes; call before dropping the last handle.
    pub async fn shutdown(&self) -> Vec<(TaskId, DeleteState)> {
        self.deletes.flush().await
    }
}
