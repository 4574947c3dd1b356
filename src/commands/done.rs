use super::{resolve_day, resolve_task};
use crate::{
    libs::{completion::Toggle, messages::Message, todo::Todo},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DoneArgs {
    /// Task id or a unique prefix of it
    id: String,
    /// Day to toggle, as YYYY-MM-DD; defaults to today
    #[arg(short, long)]
    date: Option<String>,
}

pub async fn cmd(todo: &Todo, args: DoneArgs) -> Result<()> {
    let day = resolve_day(args.date.as_deref())?;
    let task = resolve_task(todo, &args.id).await?;
    let title = task.display_title().to_string();

    match todo.toggle_completion(day, task.id).await? {
        Toggle::Marked(_) => msg_success!(Message::MarkedDone(title, day.to_string())),
        Toggle::Unmarked(_) => msg_success!(Message::MarkedUndone(title, day.to_string())),
    }
    Ok(())
}
