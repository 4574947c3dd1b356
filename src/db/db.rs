use super::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "doneday.db";

/// Owned SQLite connection with pragmas set and migrations applied.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens `file_name` inside the application data directory.
    pub fn new(file_name: &str) -> anyhow::Result<Db> {
        let db_file_path = DataStorage::new().get_path(file_name)?;
        Ok(Self::open(db_file_path)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let conn = Connection::open(path)?;
        Self::prepare(conn)
    }

    /// Private in-memory database, mostly for tests.
    pub fn in_memory() -> Result<Db> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(mut conn: Connection) -> Result<Db> {
        conn.pragma_update(None, "foreign_keys", true)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }
}
