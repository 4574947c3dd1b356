use super::resolve_day;
use crate::{
    libs::{
        messages::Message,
        task::TaskId,
        todo::Todo,
        view::{TaskRow, View},
    },
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;
use std::collections::HashSet;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Day to show, as YYYY-MM-DD; defaults to today
    #[arg(short, long)]
    date: Option<String>,
}

pub async fn cmd(todo: &Todo, args: ListArgs) -> Result<()> {
    let day = resolve_day(args.date.as_deref())?;
    let tasks = todo.visible_tasks().await?;

    if tasks.is_empty() {
        msg_info!(Message::TasksNotFound);
        return Ok(());
    }

    let done: HashSet<TaskId> = todo
        .completions_on_day(day)
        .await?
        .snapshot()
        .into_iter()
        .map(|mark| mark.task_id)
        .collect();

    let mut rows = Vec::with_capacity(tasks.len());
    for task in tasks {
        let total = todo.statistics(task.id, day).await?.total;
        rows.push(TaskRow {
            done: done.contains(&task.id),
            total,
            task,
        });
    }

    msg_print!(Message::TasksHeader(day.to_string()), true);
    View::tasks(&rows)
}
