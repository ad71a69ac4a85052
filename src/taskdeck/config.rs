use crate::error::{Result, TaskdeckError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DUE_SOON_DAYS: u32 = 7;

/// Configuration for taskdeck, stored as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskdeckConfig {
    /// Overrides the platform-default data directory when set.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Window in days for the "due soon" summary counter.
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: u32,
}

fn default_due_soon_days() -> u32 {
    DEFAULT_DUE_SOON_DAYS
}

impl Default for TaskdeckConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
        }
    }
}

impl TaskdeckConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TaskdeckError::Io)?;
        let config: TaskdeckConfig =
            serde_json::from_str(&content).map_err(TaskdeckError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory.
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TaskdeckError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TaskdeckError::Serialization)?;
        fs::write(config_path, content).map_err(TaskdeckError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_file_exists() {
        let temp = TempDir::new().unwrap();
        let config = TaskdeckConfig::load(temp.path()).unwrap();
        assert_eq!(config, TaskdeckConfig::default());
        assert_eq!(config.due_soon_days, 7);
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let config = TaskdeckConfig {
            data_dir: Some(temp.path().join("elsewhere")),
            due_soon_days: 3,
        };
        config.save(temp.path()).unwrap();

        let loaded = TaskdeckConfig::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "{}").unwrap();

        let loaded = TaskdeckConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.due_soon_days, 7);
        assert!(loaded.data_dir.is_none());
    }
}
