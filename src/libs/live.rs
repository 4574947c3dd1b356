//! Live queries: result sets that are recomputed after every write touching them.
//!
//! A [`Query`] knows how to run itself against a connection and which
//! [`Change`]s can alter its result. The store keeps a [`Registry`] of active
//! subscriptions; after a write commits, the store hands the registry the list
//! of changes and every affected subscription is re-run and published through
//! a `tokio::sync::watch` channel.
//!
//! ```text
//! write ──▶ commit ──▶ Registry::publish(changes)
//!                          │
//!                          ├─ affected? ── run query ── send_if_modified ──▶ LiveQuery
//!                          └─ closed?   ── dropped from registry
//! ```
//!
//! A [`LiveQuery`] starts out holding the initial snapshot and is cancelled by
//! dropping it. Results are handed out as clones only: publishing happens
//! under the store lock, so a caller holding a channel guard while writing
//! would stall every other store user.

use super::error::{Error, Result};
use super::task::TaskId;
use rusqlite::Connection;
use tokio::sync::watch;

/// What a committed write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A task row was inserted, updated or deleted.
    Task(TaskId),
    /// Completion marks of a task were inserted or deleted.
    Completions(TaskId),
}

pub trait Query: Send + Sync + 'static {
    type Output: Clone + PartialEq + Send + Sync + 'static;

    fn run(&self, conn: &Connection) -> Result<Self::Output>;

    fn affected_by(&self, change: &Change) -> bool;
}

/// Handle to a subscribed query.
#[derive(Debug)]
pub struct LiveQuery<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> LiveQuery<T> {
    /// Latest published result.
    pub fn snapshot(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Whether a result was published since the last `changed()`.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next published result.
    ///
    /// Fails with [`Error::Closed`] once the store is gone.
    pub async fn changed(&mut self) -> Result<T> {
        self.rx.changed().await.map_err(|_| Error::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Stops receiving updates. Same as dropping the handle.
    pub fn cancel(self) {}
}

trait Subscriber: Send {
    fn is_closed(&self) -> bool;
    fn refresh(&self, conn: &Connection, changes: &[Change]);
}

struct Subscription<Q: Query> {
    query: Q,
    tx: watch::Sender<Q::Output>,
}

impl<Q: Query> Subscriber for Subscription<Q> {
    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn refresh(&self, conn: &Connection, changes: &[Change]) {
        if !changes.iter().any(|change| self.query.affected_by(change)) {
            return;
        }

        match self.query.run(conn) {
            Ok(output) => {
                self.tx.send_if_modified(|current| {
                    if *current == output {
                        false
                    } else {
                        *current = output;
                        true
                    }
                });
            }
            // The write is already committed; keep serving the previous result.
            Err(e) => tracing::warn!(error = %e, "live query refresh failed"),
        }
    }
}

/// Active subscriptions of one store.
#[derive(Default)]
pub struct Registry {
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Registry {
    /// Runs `query` for its initial snapshot and starts tracking it.
    pub fn register<Q: Query>(&mut self, conn: &Connection, query: Q) -> Result<LiveQuery<Q::Output>> {
        let initial = query.run(conn)?;
        let (tx, rx) = watch::channel(initial);

        self.sweep();
        self.subscribers.push(Box::new(Subscription { query, tx }));
        Ok(LiveQuery { rx })
    }

    /// Re-runs every subscription affected by `changes`.
    pub fn publish(&mut self, conn: &Connection, changes: &[Change]) {
        self.sweep();
        for subscriber in &self.subscribers {
            subscriber.refresh(conn, changes);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.iter().filter(|s| !s.is_closed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&mut self) {
        self.subscribers.retain(|s| !s.is_closed());
    }
}
