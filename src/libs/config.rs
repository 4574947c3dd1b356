//! Application configuration stored as `config.json` in the doneday data directory.
//!
//! Every section is optional and left out of the file while unset, so a fresh
//! install runs without any configuration at all:
//!
//! ```json
//! {
//!   "storage": { "db_file": "doneday.db" },
//!   "deletion": { "undo_window": 10 }
//! }
//! ```
//!
//! ```rust,no_run
//! use doneday::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("undo window: {:?}", config.undo_window());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::db::db::DB_FILE_NAME;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Seconds a deleted task can still be restored.
pub const DEFAULT_UNDO_WINDOW_SECS: u64 = 10;

/// A section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StorageConfig {
    /// Database file name, relative to the data directory.
    pub db_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: DB_FILE_NAME.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeletionConfig {
    /// How long, in seconds, a requested delete waits before it is applied.
    pub undo_window: u64,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            undo_window: DEFAULT_UNDO_WINDOW_SECS,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion: Option<DeletionConfig>,
}

impl Config {
    /// Loads `config.json`, or the defaults when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not valid JSON.
    pub fn read() -> Result<Config> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(&file, &self)?;
        Ok(())
    }

    pub fn db_file(&self) -> String {
        self.storage.clone().unwrap_or_default().db_file
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_secs(self.deletion.clone().unwrap_or_default().undo_window)
    }

    pub fn modules() -> Vec<ConfigModule> {
        vec![
            ConfigModule {
                key: "storage".to_string(),
                name: "Storage".to_string(),
            },
            ConfigModule {
                key: "deletion".to_string(),
                name: "Deletion".to_string(),
            },
        ]
    }

    /// Interactive setup. Current values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let modules = Self::modules();

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &index in &selected {
            match modules[index].key.as_str() {
                "storage" => {
                    let current = config.storage.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleStorage);
                    config.storage = Some(StorageConfig {
                        db_file: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDbFile.to_string())
                            .default(current.db_file)
                            .interact_text()?,
                    });
                }
                "deletion" => {
                    let current = config.deletion.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleDeletion);
                    config.deletion = Some(DeletionConfig {
                        undo_window: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptUndoWindow.to_string())
                            .default(current.undo_window)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
