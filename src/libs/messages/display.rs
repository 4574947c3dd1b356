//! Text of every [`Message`].
//!
//! Keeping all wording in one match means a new variant cannot ship without
//! someone deciding what it says.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id, title) => format!("Task {} created: {}", id, title),
            Message::TaskUpdated(title) => format!("Task updated: {}", title),
            Message::TaskMoved(title, order) => format!("Task '{}' moved to position {}", title, order),
            Message::TaskNotFound(id) => format!("No task matches id '{}'", id),
            Message::AmbiguousTaskId(id, count) => {
                format!("Id '{}' matches {} tasks, type more characters", id, count)
            }
            Message::TasksNotFound => "No tasks yet. Add one with `doneday add <title>`".to_string(),
            Message::TasksHeader(date) => format!("Tasks for {}", date),
            Message::EditingTask(title) => format!("Editing task: {}", title),
            Message::NoChangesDetected => "No changes detected".to_string(),

            // === COMPLETION MESSAGES ===
            Message::MarkedDone(title, date) => format!("'{}' done on {}", title, date),
            Message::MarkedUndone(title, date) => format!("'{}' no longer done on {}", title, date),
            Message::FutureDate(date) => format!("{} is in the future", date),
            Message::InvalidDate(date) => format!("Invalid date '{}', expected YYYY-MM-DD", date),

            // === STATISTICS MESSAGES ===
            Message::StatsHeader(title, date) => format!("Statistics for '{}' as of {}", title, date),

            // === DELETE MESSAGES ===
            Message::DeletePending(title, secs) => {
                format!("Task '{}' will be deleted in {} seconds", title, secs)
            }
            Message::TaskDeleted(title) => format!("Task deleted: {}", title),
            Message::TaskDeleteUndone(title) => format!("Restored task: {}", title),
            Message::TaskDeleteFailed(title, error) => format!("Failed to delete '{}': {}", title, error),
            Message::PendingDeletesFlushed(count) => format!("Applied {} pending deletes", count),
            Message::PendingDeletesFailed(count) => format!("{} pending deletes could not be applied", count),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleStorage => "Storage settings".to_string(),
            Message::ConfigModuleDeletion => "Deletion settings".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptDbFile => "Database file name".to_string(),
            Message::PromptUndoWindow => "Undo window for deletes (seconds)".to_string(),
            Message::PromptTaskTitle => "Title".to_string(),
            Message::PromptTaskDescription => "Description".to_string(),
            Message::PromptUndoDelete => "Undo?".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
        };

        write!(f, "{}", text)
    }
}
