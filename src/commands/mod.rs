//! Command-line front end.
//!
//! Every command except `init` opens the configured store through a
//! [`Todo`], runs, and then flushes any delete still waiting for its undo
//! window so nothing the user removed survives the process.

pub mod done;
pub mod init;
pub mod list;
pub mod stats;
pub mod task;

use crate::libs::config::Config;
use crate::libs::day::Day;
use crate::libs::deferred::DeleteState;
use crate::libs::messages::Message;
use crate::libs::navigation::DateCursor;
use crate::libs::task::{Task, TaskId};
use crate::libs::todo::Todo;
use crate::{msg_bail_anyhow, msg_debug, msg_error, msg_error_anyhow};
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create a task")]
    Add(task::AddArgs),
    #[command(about = "Change a task's title or description")]
    Edit(task::EditArgs),
    #[command(about = "Change a task's position in the list")]
    Move(task::MoveArgs),
    #[command(about = "Delete a task and its history, with a chance to undo")]
    Delete(task::DeleteArgs),
    #[command(about = "Show tasks for a day")]
    List(list::ListArgs),
    #[command(about = "Toggle a task done for a day")]
    Done(done::DoneArgs),
    #[command(about = "Show completion statistics of a task")]
    Stats(stats::StatsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            command => {
                let todo = Todo::open(&Config::read()?)?;
                let result = run(&todo, command).await;
                let flushed = report_flushed(todo.shutdown().await);
                result.and(flushed)
            }
        }
    }
}

async fn run(todo: &Todo, command: Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::cmd(args),
        Commands::Add(args) => task::add(todo, args).await,
        Commands::Edit(args) => task::edit(todo, args).await,
        Commands::Move(args) => task::move_to(todo, args).await,
        Commands::Delete(args) => task::delete(todo, args).await,
        Commands::List(args) => list::cmd(todo, args).await,
        Commands::Done(args) => done::cmd(todo, args).await,
        Commands::Stats(args) => stats::cmd(todo, args).await,
    }
}

/// Reports deletes applied at exit. Any failed one fails the run.
fn report_flushed(flushed: Vec<(TaskId, DeleteState)>) -> Result<()> {
    if flushed.is_empty() {
        return Ok(());
    }
    let mut failed = 0;
    for (task_id, state) in &flushed {
        if let DeleteState::Failed(error) = state {
            msg_error!(Message::TaskDeleteFailed(task_id.short(), error.clone()));
            failed += 1;
        }
    }
    msg_debug!(Message::PendingDeletesFlushed(flushed.len()));

    if failed > 0 {
        msg_bail_anyhow!(Message::PendingDeletesFailed(failed));
    }
    Ok(())
}

/// Finds the visible task whose id starts with `prefix`.
///
/// Fails when no task or more than one task matches.
pub async fn resolve_task(todo: &Todo, prefix: &str) -> Result<Task> {
    let prefix = prefix.trim().to_lowercase();
    let mut matches: Vec<Task> = todo
        .visible_tasks()
        .await?
        .into_iter()
        .filter(|task| !prefix.is_empty() && task.id.to_string().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => msg_bail_anyhow!(Message::TaskNotFound(prefix)),
        1 => Ok(matches.remove(0)),
        n => msg_bail_anyhow!(Message::AmbiguousTaskId(prefix, n)),
    }
}

/// Parses `--date`, defaulting to today. Days after today are refused.
pub fn resolve_day(date: Option<&str>) -> Result<Day> {
    let mut cursor = DateCursor::new();
    let Some(raw) = date else {
        return Ok(cursor.current());
    };

    let day: Day = raw
        .trim()
        .parse()
        .map_err(|_| msg_error_anyhow!(Message::InvalidDate(raw.to_string())))?;
    if !cursor.go_to(day) {
        msg_bail_anyhow!(Message::FutureDate(day.to_string()));
    }
    Ok(cursor.current())
}
