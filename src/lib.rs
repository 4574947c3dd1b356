//! # doneday
//!
//! A daily habit checklist: tasks that can be ticked off once per day, with a
//! history of which days each task was done.
//!
//! ## Features
//!
//! - **Task Management**: create, edit and reorder tasks
//! - **Daily Completion**: toggle a task done for any past day or today
//! - **Live Queries**: lists and done flags update themselves after every write
//! - **Undoable Deletes**: a deleted task can be restored until its undo window runs out
//! - **Statistics**: completions in total, this year and this month
//!
//! ## Usage
//!
//! ```rust,no_run
//! use doneday::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
