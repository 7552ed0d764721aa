// YAML configuration

use crate::record::Record;
use crate::store::StoreOptions;
use crate::task::Task;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "todostore";
const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the storage slots
    pub data_dir: Option<PathBuf>,
    /// Storage key of the task list
    pub key: String,
    pub require_due_date: bool,
    pub require_due_time: bool,
    /// Characters of the description shown in listings
    pub preview_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: Task::collection_name().to_string(),
            require_due_date: false,
            require_due_time: false,
            preview_len: 14,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }

    /// Configured data directory, falling back to the platform data dir
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .ok_or_else(|| eyre::eyre!("Failed to find a data directory; set data_dir in the config"))
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.key.clone(),
            require_due_date: self.require_due_date,
            require_due_time: self.require_due_time,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(temp.path().join("absent.yml").as_path())).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.key, "todos");
        assert_eq!(config.preview_len, 14);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "data_dir: /tmp/tasks\nrequire_due_date: true\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tasks")));
        assert!(config.require_due_date);
        assert!(!config.require_due_time);
        assert_eq!(config.key, "todos");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/tasks"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "preview_len: [not, a, number]\n").unwrap();

        assert!(Config::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_store_options_from_config() {
        let config = Config {
            key: "work".to_string(),
            require_due_time: true,
            ..Default::default()
        };

        let options = config.store_options();
        assert_eq!(options.key, "work");
        assert!(!options.require_due_date);
        assert!(options.require_due_time);
    }
}
