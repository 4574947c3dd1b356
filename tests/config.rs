#[cfg(test)]
mod tests {
    use doneday::db::db::DB_FILE_NAME;
    use doneday::libs::config::{Config, DeletionConfig, StorageConfig, CONFIG_FILE_NAME};
    use doneday::libs::data_storage::DataStorage;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Points the data directory at a fresh temp dir.
    struct ConfigTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { _temp_dir: temp_dir }
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.storage.is_none());
        assert!(config.deletion.is_none());
        assert_eq!(config.db_file(), DB_FILE_NAME);
        assert_eq!(config.undo_window(), Duration::from_secs(10));
    }

    #[test]
    fn test_unset_sections_are_not_serialized() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert_eq!(json, "{}");

        let config: Config = serde_json::from_str(r#"{ "deletion": { "undo_window": 3 } }"#).unwrap();
        assert_eq!(config.undo_window(), Duration::from_secs(3));
        assert_eq!(config.db_file(), DB_FILE_NAME);
    }

    // Save and read share the process-wide HOME, so they run as one test.
    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_missing_then_save_and_read(_ctx: &mut ConfigTestContext) {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap();
        assert!(!path.exists());
        assert_eq!(Config::read().unwrap(), Config::default());

        let config = Config {
            storage: Some(StorageConfig {
                db_file: "habits.db".to_string(),
            }),
            deletion: Some(DeletionConfig { undo_window: 30 }),
        };
        config.save().unwrap();
        assert!(path.exists());

        let read = Config::read().unwrap();
        assert_eq!(read, config);
        assert_eq!(read.db_file(), "habits.db");
        assert_eq!(read.undo_window(), Duration::from_secs(30));

        std::fs::write(&path, "not json").unwrap();
        assert!(Config::read().is_err());
    }
}
