//! Undoable task deletion.
//!
//! Deleting a task is a two-phase affair: the task is hidden right away, and
//! only removed from the store once the undo window passes or the caller
//! confirms. Each pending delete is a small state machine:
//!
//! ```text
//!              ┌── window elapsed ──▶ ConfirmedByTimeout ─┐
//!              ├── confirm()       ──▶ ConfirmedByUser    ─┼─▶ cascade delete ──▶ (Failed on error)
//! Requested ───┼── flush()         ──▶ Flushed            ─┘
//!              └── cancel()        ──▶ Cancelled
//! ```
//!
//! Every pending delete is driven by its own tokio task racing a sleep against
//! a decision channel. Callers filter pending tasks out of their lists with
//! [`DeferredDeletes::retain_visible`]; the store itself never sees hidden
//! tasks as deleted until the cascade runs.
//!
//! [`DeferredDeletes::flush`] must be awaited before teardown so that no
//! user-initiated delete is silently dropped.

use super::error::{Error, RecordKind, Result};
use super::task::{Task, TaskId};
use crate::db::store::Store;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState {
    Requested,
    ConfirmedByTimeout,
    ConfirmedByUser,
    /// Confirmed because pending deletes were flushed at teardown.
    Flushed,
    Cancelled,
    /// The cascade delete failed; the task is still in the store.
    Failed(String),
}

impl DeleteState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, DeleteState::Requested)
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteState::ConfirmedByTimeout | DeleteState::ConfirmedByUser | DeleteState::Flushed)
    }
}

#[derive(Debug, Clone, Copy)]
enum Decision {
    Confirm,
    Cancel,
    Flush,
}

struct Entry {
    generation: u64,
    decision: Option<oneshot::Sender<Decision>>,
    handle: Option<JoinHandle<Result<DeleteState>>>,
    state: watch::Receiver<DeleteState>,
}

/// Caller's view of one pending delete.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    task_id: TaskId,
    state: watch::Receiver<DeleteState>,
}

impl PendingDelete {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn state(&self) -> DeleteState {
        self.state.borrow().clone()
    }

    /// Waits until the delete is applied, cancelled or failed.
    pub async fn settled(&mut self) -> DeleteState {
        wait_settled(self.state.clone()).await
    }
}

/// Subscription to the set of tasks hidden by pending deletes.
#[derive(Debug, Clone)]
pub struct HiddenTasks {
    rx: watch::Receiver<HashSet<TaskId>>,
}

impl HiddenTasks {
    pub fn snapshot(&self) -> HashSet<TaskId> {
        self.rx.borrow().clone()
    }

    /// Waits for the hidden set to change and returns the new set.
    ///
    /// Fails with [`Error::Closed`] once the delete queue is gone.
    pub async fn changed(&mut self) -> Result<HashSet<TaskId>> {
        self.rx.changed().await.map_err(|_| Error::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

struct Inner {
    store: Store,
    window: Duration,
    pending: Mutex<HashMap<TaskId, Entry>>,
    hidden: watch::Sender<HashSet<TaskId>>,
    generations: AtomicU64,
}

impl Inner {
    fn publish_hidden(&self, pending: &HashMap<TaskId, Entry>) {
        let ids: HashSet<TaskId> = pending.keys().copied().collect();
        self.hidden.send_if_modified(|current| {
            if *current == ids {
                false
            } else {
                *current = ids;
                true
            }
        });
    }

    /// Drops the entry for `task_id` if it still belongs to `generation`.
    fn finish(&self, task_id: TaskId, generation: u64) {
        let mut pending = self.pending.lock();
        if pending.get(&task_id).is_some_and(|entry| entry.generation == generation) {
            pending.remove(&task_id);
            self.publish_hidden(&pending);
        }
    }
}

#[derive(Clone)]
pub struct DeferredDeletes {
    inner: Arc<Inner>,
}

impl DeferredDeletes {
    pub fn new(store: Store, window: Duration) -> Self {
        let (hidden, _) = watch::channel(HashSet::new());
        Self {
            inner: Arc::new(Inner {
                store,
                window,
                pending: Mutex::new(HashMap::new()),
                hidden,
                generations: AtomicU64::new(0),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Hides `task_id` and schedules its deletion after the undo window.
    ///
    /// Requesting a task that is already pending returns the existing handle.
    pub async fn request(&self, task_id: TaskId) -> Result<PendingDelete> {
        if let Some(existing) = self.existing(task_id) {
            return Ok(existing);
        }

        let store = self.inner.store.clone();
        if store_task_missing(store, task_id).await? {
            return Err(Error::task_not_found(task_id));
        }

        let mut pending = self.inner.pending.lock();
        if let Some(entry) = pending.get(&task_id) {
            return Ok(PendingDelete {
                task_id,
                state: entry.state.clone(),
            });
        }

        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed);
        let (decision_tx, decision_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(DeleteState::Requested);
        let handle = tokio::spawn(drive(self.inner.clone(), task_id, generation, decision_rx, state_tx));

        pending.insert(
            task_id,
            Entry {
                generation,
                decision: Some(decision_tx),
                handle: Some(handle),
                state: state_rx.clone(),
            },
        );
        self.inner.publish_hidden(&pending);
        tracing::debug!(%task_id, window_ms = self.inner.window.as_millis() as u64, "delete requested");

        Ok(PendingDelete { task_id, state: state_rx })
    }

    /// Applies a pending delete now instead of waiting for the window.
    pub async fn confirm(&self, task_id: TaskId) -> Result<DeleteState> {
        self.decide(task_id, Decision::Confirm).await
    }

    /// Withdraws a pending delete; the task becomes visible again.
    pub async fn cancel(&self, task_id: TaskId) -> Result<DeleteState> {
        self.decide(task_id, Decision::Cancel).await
    }

    /// Applies every pending delete and waits for all of them.
    ///
    /// Returns the final state of each delete that was still pending.
    pub async fn flush(&self) -> Vec<(TaskId, DeleteState)> {
        let claims: Vec<_> = {
            let mut pending = self.inner.pending.lock();
            pending.iter_mut().map(|(id, entry)| (*id, claim(entry))).collect()
        };

        if !claims.is_empty() {
            tracing::info!(count = claims.len(), "flushing pending deletes");
        }

        let mut settled = Vec::with_capacity(claims.len());
        for (task_id, claim) in claims {
            let state = match claim.settle(Decision::Flush).await {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!(%task_id, error = %e, "pending delete failed during flush");
                    DeleteState::Failed(e.to_string())
                }
            };
            settled.push((task_id, state));
        }
        settled
    }

    pub fn is_pending(&self, task_id: TaskId) -> bool {
        self.inner.pending.lock().contains_key(&task_id)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending.lock().len()
    }

    /// Ids currently hidden from lists.
    pub fn hidden(&self) -> HashSet<TaskId> {
        self.inner.hidden.borrow().clone()
    }

    /// Notifies whenever the hidden set changes.
    pub fn watch_hidden(&self) -> HiddenTasks {
        HiddenTasks {
            rx: self.inner.hidden.subscribe(),
        }
    }

    /// Removes tasks with a pending delete from `tasks`.
    pub fn retain_visible(&self, tasks: &mut Vec<Task>) {
        let hidden = self.hidden();
        if !hidden.is_empty() {
            tasks.retain(|task| !hidden.contains(&task.id));
        }
    }

    fn existing(&self, task_id: TaskId) -> Option<PendingDelete> {
        self.inner.pending.lock().get(&task_id).map(|entry| PendingDelete {
            task_id,
            state: entry.state.clone(),
        })
    }

    async fn decide(&self, task_id: TaskId, decision: Decision) -> Result<DeleteState> {
        let claim = {
            let mut pending = self.inner.pending.lock();
            match pending.get_mut(&task_id) {
                Some(entry) => claim(entry),
                None => {
                    return Err(Error::NotFound {
                        kind: RecordKind::PendingDelete,
                        id: task_id.to_string(),
                    })
                }
            }
        };
        claim.settle(decision).await
    }
}

/// Everything needed to push an entry to its end state from outside the map lock.
struct Claim {
    decision: Option<oneshot::Sender<Decision>>,
    handle: Option<JoinHandle<Result<DeleteState>>>,
    state: watch::Receiver<DeleteState>,
}

fn claim(entry: &mut Entry) -> Claim {
    Claim {
        decision: entry.decision.take(),
        handle: entry.handle.take(),
        state: entry.state.clone(),
    }
}

impl Claim {
    async fn settle(self, decision: Decision) -> Result<DeleteState> {
        // A decision already taken by someone else wins; we just wait for it.
        if let Some(tx) = self.decision {
            let _ = tx.send(decision);
        }
        match self.handle {
            Some(handle) => handle.await?,
            None => Ok(wait_settled(self.state).await),
        }
    }
}

async fn wait_settled(mut state: watch::Receiver<DeleteState>) -> DeleteState {
    if let Ok(settled) = state.wait_for(DeleteState::is_settled).await {
        return settled.clone();
    }
    // Driver went away without settling
    state.borrow().clone()
}

async fn store_task_missing(store: Store, task_id: TaskId) -> Result<bool> {
    let task = tokio::task::spawn_blocking(move || store.get_task(task_id)).await??;
    Ok(task.is_none())
}

async fn drive(
    inner: Arc<Inner>,
    task_id: TaskId,
    generation: u64,
    decision_rx: oneshot::Receiver<Decision>,
    state: watch::Sender<DeleteState>,
) -> Result<DeleteState> {
    let verdict = tokio::select! {
        _ = tokio::time::sleep(inner.window) => DeleteState::ConfirmedByTimeout,
        decision = decision_rx => match decision {
            Ok(Decision::Confirm) => DeleteState::ConfirmedByUser,
            Ok(Decision::Cancel) => DeleteState::Cancelled,
            Ok(Decision::Flush) => DeleteState::Flushed,
            // Sender dropped without deciding: apply rather than lose the delete
            Err(_) => DeleteState::Flushed,
        },
    };

    let result = if verdict.is_deleted() {
        let store = inner.store.clone();
        match tokio::task::spawn_blocking(move || store.delete_task_cascade(task_id)).await {
            Ok(Ok(report)) => {
                tracing::info!(%task_id, marks = report.marks_removed, state = ?verdict, "task deleted");
                Ok(verdict)
            }
            // Already gone, e.g. deleted through another path
            Ok(Err(e)) if e.is_not_found() => Ok(verdict),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(e.into()),
        }
    } else {
        tracing::debug!(%task_id, "delete cancelled");
        Ok(verdict)
    };

    inner.finish(task_id, generation);
    let final_state = match &result {
        Ok(settled) => settled.clone(),
        Err(e) => {
            tracing::error!(%task_id, error = %e, "deferred delete failed");
            DeleteState::Failed(e.to_string())
        }
    };
    state.send_replace(final_state);

    result
}
