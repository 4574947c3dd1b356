//! Database schema migration management and versioning.
//!
//! Migrations are registered in version order and every pending one is
//! applied inside a single transaction when a [`super::db::Db`] is opened.
//! Applied versions are recorded in the `migrations` table.
//!
//! ## Usage
//!
//! ```rust
//! use doneday::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? >= 1);
//! # Ok::<(), doneday::libs::error::Error>(())
//! ```

use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// Schema of the table recording which migrations have run.
///
/// One row per applied version, with its name and when it was applied.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change.
#[derive(Debug, Clone)]
struct Migration {
    /// Position in the upgrade sequence; also the schema version once applied
    version: u32,
    /// Short name recorded in the `migrations` table
    name: &'static str,
    /// Applies the change inside the shared upgrade transaction
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Registry of schema migrations, applied in version order.
///
/// Meant to run once while a [`super::db::Db`] is opened, before the
/// connection is shared with the store.
pub struct MigrationManager {
    /// Registered migrations, ascending by version
    migrations: Vec<Migration>,
}

impl MigrationManager {
    /// Creates a manager with every known migration registered.
    ///
    /// ```rust
    /// use doneday::db::migrations::MigrationManager;
    ///
    /// let manager = MigrationManager::new();
    /// let mut conn = rusqlite::Connection::open_in_memory()?;
    /// manager.run_migrations(&mut conn)?;
    /// assert!(manager.is_migration_applied(&conn, 1)?);
    /// # Ok::<(), doneday::libs::error::Error>(())
    /// ```
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: tasks and their per-day completion marks
        self.add_migration(1, "create_tasks_and_completions", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id TEXT NOT NULL PRIMARY KEY,
                    \"order\" INTEGER NOT NULL DEFAULT 0,
                    title TEXT NOT NULL DEFAULT '',
                    description TEXT NOT NULL DEFAULT ''
                )",
                [],
            )?;

            // `date` is a UTC epoch-day
            tx.execute(
                "CREATE TABLE IF NOT EXISTS completions (
                    id TEXT NOT NULL PRIMARY KEY,
                    date INTEGER NOT NULL,
                    task_id TEXT NOT NULL,
                    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_order ON tasks(\"order\")", [])?;
            // At most one mark per (day, task)
            tx.execute(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_completions_date_task ON completions(date, task_id)",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_completions_task_id ON completions(task_id)", [])?;
            Ok(())
        });
    }

    /// Appends a migration. Versions must be registered in ascending order.
    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the current schema version.
    ///
    /// All pending migrations share one transaction; if any of them fails
    /// nothing is committed.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_info!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(e.into());
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            tracing::debug!(version = migration.version, name = migration.name, "migration applied");
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    /// Highest applied version, or 0 for a fresh database.
    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))
            .optional()?
            .flatten();

        Ok(version.unwrap_or(0))
    }

    /// Whether `version` has been recorded as applied.
    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(history)
    }

    /// Version the schema reaches once every migration has run.
    fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Brings the schema of `conn` up to date. Called on every open.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

/// Current schema version of `conn`.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

/// Whether `conn` is behind the latest registered migration.
pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
