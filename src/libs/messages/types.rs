/// Every user-facing line doneday prints.
///
/// Variants carry the values they interpolate; the text lives in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(String, String), // short id, title
    TaskUpdated(String),
    TaskMoved(String, i64),
    TaskNotFound(String),
    AmbiguousTaskId(String, usize),
    TasksNotFound,
    TasksHeader(String), // date
    EditingTask(String),
    NoChangesDetected,

    // === COMPLETION MESSAGES ===
    MarkedDone(String, String),   // title, date
    MarkedUndone(String, String), // title, date
    FutureDate(String),
    InvalidDate(String),

    // === STATISTICS MESSAGES ===
    StatsHeader(String, String), // title, reference date

    // === DELETE MESSAGES ===
    DeletePending(String, u64), // title, seconds
    TaskDeleted(String),
    TaskDeleteUndone(String),
    TaskDeleteFailed(String, String),
    PendingDeletesFlushed(usize),
    PendingDeletesFailed(usize),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleStorage,
    ConfigModuleDeletion,

    // === PROMPTS ===
    PromptSelectModules,
    PromptDbFile,
    PromptUndoWindow,
    PromptTaskTitle,
    PromptTaskDescription,
    PromptUndoDelete,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseUpToDate,
}
