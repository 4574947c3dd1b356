#[cfg(test)]
mod tests {
    use doneday::db::db::Db;
    use doneday::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use rusqlite::{params, Connection};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_on_open(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.temp_dir.path().join("doneday.db")).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), 1);
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_manager_records_history(_ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open_in_memory().unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        assert!(manager.is_migration_applied(&conn, 1).unwrap());
        assert!(!manager.is_migration_applied(&conn, 2).unwrap());

        let history = manager.get_migration_history(&conn).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].0, 1);
        assert_eq!(history[0].1, "create_tasks_and_completions");
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let path = ctx.temp_dir.path().join("doneday.db");
        let mut conn = Connection::open(&path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();
        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), 1);

        drop(conn);
        let db = Db::open(&path).unwrap();
        assert_eq!(get_db_version(&db.conn).unwrap(), 1);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_completion_pair_is_unique(_ctx: &mut MigrationTestContext) {
        let db = Db::in_memory().unwrap();
        db.conn
            .execute("INSERT INTO tasks (id, title) VALUES ('t1', 'task')", [])
            .unwrap();

        let insert = "INSERT INTO completions (id, date, task_id) VALUES (?1, ?2, ?3)";
        db.conn.execute(insert, params!["m1", 19_727, "t1"]).unwrap();
        assert!(db.conn.execute(insert, params!["m2", 19_727, "t1"]).is_err());
        db.conn.execute(insert, params!["m3", 19_728, "t1"]).unwrap();
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_foreign_keys_enforced(_ctx: &mut MigrationTestContext) {
        let db = Db::in_memory().unwrap();

        let orphan = db.conn.execute(
            "INSERT INTO completions (id, date, task_id) VALUES ('m1', 19727, 'missing')",
            [],
        );
        assert!(orphan.is_err());

        db.conn
            .execute("INSERT INTO tasks (id, title) VALUES ('t1', 'task')", [])
            .unwrap();
        db.conn
            .execute("INSERT INTO completions (id, date, task_id) VALUES ('m1', 19727, 't1')", [])
            .unwrap();
        db.conn.execute("DELETE FROM tasks WHERE id = 't1'", []).unwrap();

        let remaining: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
