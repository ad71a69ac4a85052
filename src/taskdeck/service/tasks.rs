use std::collections::HashMap;

use chrono::{Days, Local, NaiveDate};
use log::debug;
use uuid::Uuid;

use super::reminders::ReminderService;
use crate::error::{Result, TaskdeckError};
use crate::events::{ChangeAction, ChangeEvent, EntityKind, EventBus};
use crate::model::{Category, PriorityLevel, Task, TaskStatus};
use crate::store::DataStore;

/// Optional filters for [`TaskService::search`]. An absent filter matches
/// everything; the title filter is a case-insensitive substring match, the
/// category and priority filters compare against the embedded copies by value.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<PriorityLevel>,
}

/// Owns tasks. Deleting a task or completing one cascades into the
/// [`ReminderService`] handed to the operation; nothing else in the system
/// removes reminders on a task's behalf.
pub struct TaskService {
    tasks: HashMap<Uuid, Task>,
}

impl TaskService {
    pub fn load<S: DataStore>(store: &S) -> Result<Self> {
        let tasks = store.load_tasks()?.into_iter().map(|t| (t.id, t)).collect();
        Ok(Self { tasks })
    }

    pub fn create<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        priority: PriorityLevel,
        deadline: NaiveDate,
    ) -> Result<Task> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskdeckError::InvalidInput(
                "task title must not be empty".to_string(),
            ));
        }
        if category.name.trim().is_empty() {
            return Err(TaskdeckError::InvalidInput(
                "category name must not be empty".to_string(),
            ));
        }
        if priority.name.trim().is_empty() {
            return Err(TaskdeckError::InvalidInput(
                "priority name must not be empty".to_string(),
            ));
        }

        let task = Task::new(title, description.into(), category, priority, deadline);
        self.tasks.insert(task.id, task.clone());
        events.emit(ChangeEvent::new(EntityKind::Task, ChangeAction::Created, task.id));
        self.save(store)?;
        Ok(task)
    }

    /// Full replacement by id, inserting when the id is unknown. A task
    /// arriving as `Completed` has its reminders removed before the task
    /// itself is stored.
    pub fn update<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        reminders: &mut ReminderService,
        task: Task,
    ) -> Result<Task> {
        if task.status == TaskStatus::Completed {
            reminders.delete_for_task(store, events, task.id)?;
        }
        self.tasks.insert(task.id, task.clone());
        events.emit(ChangeEvent::new(EntityKind::Task, ChangeAction::Updated, task.id));
        self.save(store)?;
        Ok(task)
    }

    /// Remove a task and, unconditionally, every reminder pointing at it.
    pub fn delete<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        reminders: &mut ReminderService,
        id: Uuid,
    ) -> Result<()> {
        let removed = self.tasks.remove(&id).is_some();
        reminders.delete_for_task(store, events, id)?;
        if removed {
            events.emit(ChangeEvent::new(EntityKind::Task, ChangeAction::Deleted, id));
        }
        self.save(store)
    }

    /// Flip every task whose deadline has passed to `Delayed`, skipping
    /// completed and already-delayed tasks. This is the only place the
    /// `Delayed` status is computed; a single batched save happens only when
    /// at least one task changed.
    pub fn check_deadlines<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        today: NaiveDate,
    ) -> Result<usize> {
        let mut changed = Vec::new();
        for task in self.tasks.values_mut() {
            if task.status != TaskStatus::Delayed && task.is_overdue(today) {
                task.status = TaskStatus::Delayed;
                changed.push(task.id);
            }
        }
        if !changed.is_empty() {
            debug!("{} task(s) past their deadline, now delayed", changed.len());
            for id in &changed {
                events.emit(ChangeEvent::new(EntityKind::Task, ChangeAction::Updated, *id));
            }
            self.save(store)?;
        }
        Ok(changed.len())
    }

    pub fn by_id(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// All tasks, ordered by deadline then title.
    pub fn all(&self) -> Vec<Task> {
        self.snapshot()
    }

    pub fn uncompleted(&self) -> Vec<Task> {
        self.snapshot()
            .into_iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .collect()
    }

    pub fn by_category(&self, category: &Category) -> Vec<Task> {
        self.snapshot()
            .into_iter()
            .filter(|t| t.category.as_ref() == Some(category))
            .collect()
    }

    pub fn search(&self, query: &TaskQuery) -> Vec<Task> {
        let title = query.title.as_ref().map(|t| t.to_lowercase());
        self.snapshot()
            .into_iter()
            .filter(|t| match &title {
                Some(needle) => t.title.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|t| match &query.category {
                Some(category) => t.category.as_ref() == Some(category),
                None => true,
            })
            .filter(|t| match &query.priority {
                Some(priority) => t.priority == *priority,
                None => true,
            })
            .collect()
    }

    pub fn delayed_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|t| t.status == TaskStatus::Delayed)
            .count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    /// Non-completed tasks due on or before `today + days`.
    pub fn due_within(&self, days: u32, today: NaiveDate) -> usize {
        let horizon = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        self.tasks
            .values()
            .filter(|t| t.status != TaskStatus::Completed && t.deadline <= horizon)
            .count()
    }

    pub fn due_within_today(&self, days: u32) -> usize {
        self.due_within(days, Local::now().date_naive())
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.values_mut()
    }

    fn snapshot(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| {
            a.deadline
                .cmp(&b.deadline)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        tasks
    }

    pub(crate) fn save<S: DataStore>(&self, store: &mut S) -> Result<()> {
        store.save_tasks(&self.snapshot())
    }
}
