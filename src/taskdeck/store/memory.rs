use super::DataStore;
use crate::error::{Result, TaskdeckError};
use crate::events::EntityKind;
use crate::model::{Category, PriorityLevel, Reminder, Task};

/// In-memory storage for testing and development. Holds whatever was last
/// saved; does NOT persist anything. Counts saves per entity kind so tests
/// can assert on batching, and can be flipped into a failing mode to exercise
/// the storage-failure policy.
#[derive(Default)]
pub struct InMemoryStore {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    priorities: Vec<PriorityLevel>,
    reminders: Vec<Reminder>,
    task_saves: usize,
    category_saves: usize,
    priority_saves: usize,
    reminder_saves: usize,
    fail_saves: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every save fails with a store error and leaves the held
    /// data untouched.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn save_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Task => self.task_saves,
            EntityKind::Category => self.category_saves,
            EntityKind::Priority => self.priority_saves,
            EntityKind::Reminder => self.reminder_saves,
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_saves {
            return Err(TaskdeckError::Store(
                "in-memory store is in fail-saves mode".to_string(),
            ));
        }
        Ok(())
    }
}

impl DataStore for InMemoryStore {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        self.check_writable()?;
        self.tasks = tasks.to_vec();
        self.task_saves += 1;
        Ok(())
    }

    fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn save_categories(&mut self, categories: &[Category]) -> Result<()> {
        self.check_writable()?;
        self.categories = categories.to_vec();
        self.category_saves += 1;
        Ok(())
    }

    fn load_priorities(&self) -> Result<Vec<PriorityLevel>> {
        Ok(self.priorities.clone())
    }

    fn save_priorities(&mut self, priorities: &[PriorityLevel]) -> Result<()> {
        self.check_writable()?;
        self.priorities = priorities.to_vec();
        self.priority_saves += 1;
        Ok(())
    }

    fn load_reminders(&self) -> Result<Vec<Reminder>> {
        Ok(self.reminders.clone())
    }

    fn save_reminders(&mut self, reminders: &[Reminder]) -> Result<()> {
        self.check_writable()?;
        self.reminders = reminders.to_vec();
        self.reminder_saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::{Category, PriorityLevel, Task, TaskStatus};
    use chrono::NaiveDate;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn category(name: &str) -> Category {
        Category::new(name)
    }

    pub fn level(name: &str, is_default: bool) -> PriorityLevel {
        PriorityLevel::new(name, is_default)
    }

    pub fn task(title: &str, category: &Category, priority: &PriorityLevel, deadline: NaiveDate) -> Task {
        Task::new(title, "", category.clone(), priority.clone(), deadline)
    }

    pub fn completed_task(
        title: &str,
        category: &Category,
        priority: &PriorityLevel,
        deadline: NaiveDate,
    ) -> Task {
        let mut task = task(title, category, priority, deadline);
        task.status = TaskStatus::Completed;
        task
    }
}
