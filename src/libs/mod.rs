//! Domain model and services for doneday.
//!
//! - Model: [`task`], [`completion`], [`day`]
//! - Live query plumbing: [`live`]
//! - Undoable deletes: [`deferred`]
//! - Async facade used by the CLI: [`todo`]
//! - Viewing helpers: [`navigation`], [`stats`], [`view`]
//! - Infrastructure: [`config`], [`data_storage`], [`error`], [`messages`]
//!
//! ## Usage
//!
//! ```rust
//! use doneday::libs::{day::Day, stats::CompletionStats};
//!
//! let stats = CompletionStats::from_marks(&[], Day::today());
//! assert_eq!(stats.total, 0);
//! ```

pub mod completion;
pub mod config;
pub mod data_storage;
pub mod day;
pub mod deferred;
pub mod error;
pub mod live;
pub mod messages;
pub mod navigation;
pub mod stats;
pub mod task;
pub mod todo;
pub mod view;
