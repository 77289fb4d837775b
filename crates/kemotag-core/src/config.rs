//! Offline store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use kemotag_storage::constants::DB_NAME;
use kemotag_storage::{Database, StorageTarget};

use crate::error::CoreError;
use crate::Result;

const DATA_DIR_ENV: &str = "KEMOTAG_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the store lives
    pub storage: StorageTarget,
    /// Optional size cap in database pages
    #[serde(default)]
    pub max_page_count: Option<u32>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            storage: StorageTarget::File(data_dir.join(format!("{DB_NAME}.db"))),
            max_page_count: None,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            storage: StorageTarget::Memory,
            max_page_count: None,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let StorageTarget::File(path) = &self.storage {
            if path.as_os_str().is_empty() {
                return Err(CoreError::Config(
                    "Database path cannot be empty".to_string(),
                ));
            }
        }

        if self.max_page_count == Some(0) {
            return Err(CoreError::Config(
                "max_page_count must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the (not yet opened) database this configuration describes.
    pub fn database(&self) -> Database {
        let db = Database::new(self.storage.clone());
        match self.max_page_count {
            Some(pages) => db.with_max_page_count(pages),
            None => db,
        }
    }

    /// `KEMOTAG_DATA_DIR` if set, otherwise `kemotag/` under the platform data dir.
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = env_path(DATA_DIR_ENV) {
            return dir;
        }

        platform_data_dir()
            .map(|d| d.join("kemotag"))
            .unwrap_or_else(|| PathBuf::from(".kemotag"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn platform_data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        env_path("LOCALAPPDATA")
    } else if cfg!(target_os = "macos") {
        env_path("HOME").map(|home| home.join("Library/Application Support"))
    } else if cfg!(target_os = "linux") {
        env_path("XDG_DATA_HOME").or_else(|| env_path("HOME").map(|home| home.join(".local/share")))
    } else {
        None
    }
}
