use super::{resolve_day, resolve_task};
use crate::{
    libs::{messages::Message, todo::Todo, view::View},
    msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Task id or a unique prefix of it
    id: String,
    /// Reference day for the year and month counts; defaults to today
    #[arg(short, long)]
    date: Option<String>,
}

pub async fn cmd(todo: &Todo, args: StatsArgs) -> Result<()> {
    let day = resolve_day(args.date.as_deref())?;
    let task = resolve_task(todo, &args.id).await?;
    let stats = todo.statistics(task.id, day).await?;

    msg_print!(Message::StatsHeader(task.display_title().to_string(), day.to_string()), true);
    View::stats(&stats)
}
