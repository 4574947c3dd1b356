//! Storage layer for doneday.
//!
//! Two tables live in one SQLite file: `tasks` and `completions` (one row per
//! task per day it was done). The modules split the layer leaf to root:
//!
//! - [`db`] opens the connection, enables foreign keys and applies
//!   [`migrations`].
//! - [`tasks`] and [`completions`] are the repositories: plain SQL over a
//!   borrowed connection or transaction.
//! - [`cascade`] removes a task and its marks in one transaction.
//! - [`queries`] defines the live queries callers can subscribe to.
//! - [`store`] serializes every write through one lock and refreshes live
//!   queries after each commit.
//!
//! ## Usage
//!
//! ```rust
//! use doneday::db::{queries::AllTasks, store::Store};
//! use doneday::libs::day::Day;
//!
//! let store = Store::in_memory()?;
//! let tasks = store.subscribe(AllTasks)?;
//!
//! let task = store.create_task("Buy milk", "")?;
//! assert_eq!(tasks.snapshot().len(), 1);
//!
//! assert!(store.toggle_completion(Day::today(), task.id)?.is_done());
//! # Ok::<(), doneday::libs::error::Error>(())
//! ```

pub mod cascade;
pub mod completions;
pub mod db;
pub mod migrations;
pub mod queries;
pub mod store;
pub mod tasks;
