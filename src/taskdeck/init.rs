use crate::api::TaskSystem;
use crate::config::TaskdeckConfig;
use crate::error::Result;
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Platform-default data directory; falls back to a hidden directory under
/// the working directory when the platform dirs cannot be determined.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("dev", "taskdeck", "taskdeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".taskdeck"))
}

/// Where the entity files live for a given config.
pub fn resolve_data_dir(config: &TaskdeckConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(default_data_dir)
}

/// Build a ready-to-use system backed by files in the default (or
/// configured) data directory: loads config, opens the store, bootstraps,
/// reconciles.
pub fn initialize() -> Result<TaskSystem<FileStore>> {
    let config = TaskdeckConfig::load(default_data_dir())?;
    initialize_with(config)
}

pub fn initialize_with(config: TaskdeckConfig) -> Result<TaskSystem<FileStore>> {
    let store = FileStore::new(resolve_data_dir(&config));
    let system = TaskSystem::open(store)?.with_due_soon_days(config.due_soon_days);
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_data_dir_wins_over_the_platform_default() {
        let config = TaskdeckConfig {
            data_dir: Some(PathBuf::from("/tmp/elsewhere")),
            ..TaskdeckConfig::default()
        };
        assert_eq!(resolve_data_dir(&config), PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn default_config_resolves_to_the_platform_dir() {
        let config = TaskdeckConfig::default();
        assert_eq!(resolve_data_dir(&config), default_data_dir());
    }
}
