use super::DataStore;
use crate::error::{Result, TaskdeckError};
use crate::model::{Category, PriorityLevel, Reminder, Task};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const TASKS_FILE: &str = "tasks.json";
const CATEGORIES_FILE: &str = "categories.json";
const PRIORITIES_FILE: &str = "priorities.json";
const REMINDERS_FILE: &str = "reminders.json";

/// File-backed store: one pretty-printed JSON array per entity kind under a
/// base directory. The directory is created on the first save.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(TaskdeckError::Io)?;
        }
        Ok(())
    }

    fn load_from<T: DeserializeOwned>(&self, filename: &str) -> Result<Vec<T>> {
        let path = self.base_dir.join(filename);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(TaskdeckError::Io)?;
        let items = serde_json::from_str(&content).map_err(TaskdeckError::Serialization)?;
        Ok(items)
    }

    fn save_to<T: Serialize>(&self, filename: &str, items: &[T]) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(items).map_err(TaskdeckError::Serialization)?;
        fs::write(self.base_dir.join(filename), content).map_err(TaskdeckError::Io)?;
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        self.load_from(TASKS_FILE)
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        self.save_to(TASKS_FILE, tasks)
    }

    fn load_categories(&self) -> Result<Vec<Category>> {
        self.load_from(CATEGORIES_FILE)
    }

    fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        self.save_to(CATEGORIES_FILE, categories)
    }

    fn load_priorities(&self) -> Result<Vec<PriorityLevel>> {
        self.load_from(PRIORITIES_FILE)
    }

    fn save_priorities(&mut self, priorities: &[PriorityLevel]) -> Result<()> {
        self.save_to(PRIORITIES_FILE, priorities)
    }

    fn load_reminders(&self) -> Result<Vec<Reminder>> {
        self.load_from(REMINDERS_FILE)
    }

    fn save_reminders(&mut self, reminders: &[Reminder]) -> Result<()> {
        self.save_to(REMINDERS_FILE, reminders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn loads_empty_lists_when_nothing_was_saved() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("data"));

        assert!(store.load_tasks().unwrap().is_empty());
        assert!(store.load_categories().unwrap().is_empty());
        assert!(store.load_priorities().unwrap().is_empty());
        assert!(store.load_reminders().unwrap().is_empty());
    }

    #[test]
    fn round_trips_every_entity_kind() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().join("data"));

        let category = Category::new("Work");
        let priority = PriorityLevel::new("Default", true);
        let task = Task::new(
            "Report",
            "Quarterly report",
            category.clone(),
            priority.clone(),
            date(2024, 1, 10),
        );
        let reminder = Reminder::new(task.id, crate::model::ReminderType::OneWeekBefore, date(2024, 1, 3));

        store.save_categories(std::slice::from_ref(&category)).unwrap();
        store.save_priorities(std::slice::from_ref(&priority)).unwrap();
        store.save_tasks(std::slice::from_ref(&task)).unwrap();
        store.save_reminders(std::slice::from_ref(&reminder)).unwrap();

        assert_eq!(store.load_categories().unwrap(), vec![category]);
        assert_eq!(store.load_priorities().unwrap(), vec![priority]);
        assert_eq!(store.load_tasks().unwrap(), vec![task]);
        assert_eq!(store.load_reminders().unwrap(), vec![reminder]);
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_list() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TASKS_FILE), "not json").unwrap();

        let store = FileStore::new(&dir);
        assert!(matches!(
            store.load_tasks(),
            Err(TaskdeckError::Serialization(_))
        ));
    }
}
