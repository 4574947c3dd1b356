use super::resolve_task;
use crate::{
    libs::{
        deferred::{DeleteState, PendingDelete},
        messages::Message,
        task::UNTITLED,
        todo::Todo,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tokio::sync::oneshot;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task title, may be empty
    title: String,
    #[arg(short, long, default_value = "")]
    description: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task id or a unique prefix of it
    id: String,
    #[arg(short, long)]
    title: Option<String>,
    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Task id or a unique prefix of it
    id: String,
    /// New sort key; lower comes first
    #[arg(allow_hyphen_values = true)]
    order: i64,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Task id or a unique prefix of it
    id: String,
    /// Delete right away without offering undo
    #[arg(short, long)]
    yes: bool,
}

pub async fn add(todo: &Todo, args: AddArgs) -> Result<()> {
    let id = todo.create_task(&args.title, &args.description).await?;
    let title = if args.title.trim().is_empty() { UNTITLED } else { args.title.as_str() };

    msg_success!(Message::TaskCreated(id.short(), title.to_string()));
    Ok(())
}

pub async fn edit(todo: &Todo, args: EditArgs) -> Result<()> {
    let task = resolve_task(todo, &args.id).await?;

    let (title, description) = match (args.title, args.description) {
        (None, None) => {
            msg_print!(Message::EditingTask(task.display_title().to_string()), true);
            let title: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTaskTitle.to_string())
                .default(task.title.clone())
                .allow_empty(true)
                .interact_text()?;
            let description: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTaskDescription.to_string())
                .default(task.description.clone())
                .allow_empty(true)
                .interact_text()?;
            (title, description)
        }
        (title, description) => (
            title.unwrap_or_else(|| task.title.clone()),
            description.unwrap_or_else(|| task.description.clone()),
        ),
    };

    if title == task.title && description == task.description {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    let updated = todo.update_task(task.id, &title, &description).await?;
    msg_success!(Message::TaskUpdated(updated.display_title().to_string()));
    Ok(())
}

pub async fn move_to(todo: &Todo, args: MoveArgs) -> Result<()> {
    let task = resolve_task(todo, &args.id).await?;
    let moved = todo.set_task_order(task.id, args.order).await?;

    msg_success!(Message::TaskMoved(moved.display_title().to_string(), moved.order));
    Ok(())
}

/// Requests the delete, then races an undo prompt against the undo window.
pub async fn delete(todo: &Todo, args: DeleteArgs) -> Result<()> {
    let task = resolve_task(todo, &args.id).await?;
    let title = task.display_title().to_string();
    let pending = todo.request_delete_task(task.id).await?;

    let state = if args.yes {
        decide(todo, &pending, false).await?
    } else {
        msg_warning!(Message::DeletePending(title.clone(), todo.deletes().window().as_secs()));

        // dialoguer blocks; a plain thread is left behind if the window wins
        let (answer_tx, answer_rx) = oneshot::channel();
        let prompt = Message::PromptUndoDelete.to_string();
        std::thread::spawn(move || {
            let answer = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact();
            let _ = answer_tx.send(answer);
        });

        let mut waiter = pending.clone();
        tokio::select! {
            settled = waiter.settled() => {
                eprintln!();
                settled
            }
            answer = answer_rx => {
                let undo = matches!(answer, Ok(Ok(true)));
                decide(todo, &pending, undo).await?
            }
        }
    };

    report_outcome(title, state)
}

/// Prints how a delete ended; a failed cascade fails the command.
fn report_outcome(title: String, state: DeleteState) -> Result<()> {
    match state {
        DeleteState::Cancelled => msg_success!(Message::TaskDeleteUndone(title)),
        DeleteState::Failed(error) => msg_bail_anyhow!(Message::TaskDeleteFailed(title, error)),
        _ => msg_success!(Message::TaskDeleted(title)),
    }
    Ok(())
}

/// Confirms or cancels; if the window already settled it, reports that outcome.
async fn decide(todo: &Todo, pending: &PendingDelete, undo: bool) -> Result<DeleteState> {
    let decided = if undo {
        todo.cancel_delete(pending.task_id()).await
    } else {
        todo.confirm_delete(pending.task_id()).await
    };

    match decided {
        Ok(state) => Ok(state),
        Err(e) if e.is_not_found() => Ok(pending.clone().settled().await),
        Err(e) => Err(e.into()),
    }
}
