//! # System Facade
//!
//! [`TaskSystem`] is the single entry point for all taskdeck operations. It
//! owns the persistence backend, the four entity services, and the event bus,
//! and does the cross-service wiring so callers never thread services into
//! each other by hand.
//!
//! ## What the facade does
//!
//! - **Startup** ([`TaskSystem::open`]): load every service, seed the
//!   built-in categories and priority levels on a first run, flip overdue
//!   tasks to delayed, then reconcile the embedded copies against the
//!   canonical entities.
//! - **Dispatch**: each public method hands the right combination of store,
//!   event bus, and sibling services to the service that implements the
//!   operation.
//!
//! ## Generic over DataStore
//!
//! `TaskSystem<S: DataStore>` works against any storage backend:
//! production uses `FileStore`, tests use `InMemoryStore`.
//!
//! Methods with an `_at` suffix take an explicit "today" so tests and batch
//! callers can pin the clock; the plain forms use the local calendar date.

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::error::{Result, TaskdeckError};
use crate::events::{ChangeListener, EventBus};
use crate::model::{Category, PriorityLevel, Reminder, ReminderType, Task};
use crate::service::{
    reconcile, CategoryService, PriorityService, ReminderService, TaskQuery, TaskService,
};
use crate::store::DataStore;

const DEFAULT_DUE_SOON_DAYS: u32 = 7;

pub struct TaskSystem<S: DataStore> {
    store: S,
    tasks: TaskService,
    categories: CategoryService,
    priorities: PriorityService,
    reminders: ReminderService,
    events: EventBus,
    due_soon_days: u32,
}

impl<S: DataStore> TaskSystem<S> {
    /// Load everything from `store` and bring the system to a consistent
    /// state: bootstrap defaults, deadline check, reconciliation.
    pub fn open(store: S) -> Result<Self> {
        Self::open_at(store, Local::now().date_naive())
    }

    pub fn open_at(mut store: S, today: NaiveDate) -> Result<Self> {
        let events = EventBus::new();
        let reminders = ReminderService::load(&store)?;
        let mut tasks = TaskService::load(&store)?;
        let mut categories = CategoryService::load(&store)?;
        let mut priorities = PriorityService::load(&store)?;

        categories.bootstrap(&mut store, &events)?;
        priorities.bootstrap(&mut store, &events)?;
        tasks.check_deadlines(&mut store, &events, today)?;
        reconcile::reconcile_categories(&mut store, &events, &mut tasks, &categories)?;
        reconcile::reconcile_priorities(&mut store, &events, &mut tasks, &priorities)?;

        Ok(Self {
            store,
            tasks,
            categories,
            priorities,
            reminders,
            events,
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
        })
    }

    /// Override the window used by [`TaskSystem::due_soon_count`].
    pub fn with_due_soon_days(mut self, days: u32) -> Self {
        self.due_soon_days = days;
        self
    }

    /// Register a listener for change notifications, cascaded mutations
    /// included.
    pub fn subscribe(&mut self, listener: Box<dyn ChangeListener>) {
        self.events.subscribe(listener);
    }

    // --- tasks ---

    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        priority: PriorityLevel,
        deadline: NaiveDate,
    ) -> Result<Task> {
        self.tasks.create(
            &mut self.store,
            &self.events,
            title,
            description,
            category,
            priority,
            deadline,
        )
    }

    pub fn update_task(&mut self, task: Task) -> Result<Task> {
        self.tasks
            .update(&mut self.store, &self.events, &mut self.reminders, task)
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<()> {
        self.tasks
            .delete(&mut self.store, &self.events, &mut self.reminders, id)
    }

    pub fn check_deadlines(&mut self) -> Result<usize> {
        self.check_deadlines_at(Local::now().date_naive())
    }

    pub fn check_deadlines_at(&mut self, today: NaiveDate) -> Result<usize> {
        self.tasks
            .check_deadlines(&mut self.store, &self.events, today)
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.by_id(id)
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.all()
    }

    pub fn uncompleted_tasks(&self) -> Vec<Task> {
        self.tasks.uncompleted()
    }

    pub fn tasks_by_category(&self, category: &Category) -> Vec<Task> {
        self.tasks.by_category(category)
    }

    pub fn search_tasks(&self, query: &TaskQuery) -> Vec<Task> {
        self.tasks.search(query)
    }

    pub fn delayed_count(&self) -> usize {
        self.tasks.delayed_count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.completed_count()
    }

    /// Non-completed tasks due inside the configured "due soon" window.
    pub fn due_soon_count(&self) -> usize {
        self.tasks.due_within_today(self.due_soon_days)
    }

    pub fn due_within(&self, days: u32) -> usize {
        self.tasks.due_within_today(days)
    }

    pub fn due_within_at(&self, days: u32, today: NaiveDate) -> usize {
        self.tasks.due_within(days, today)
    }

    // --- categories ---

    pub fn create_category(&mut self, name: impl Into<String>) -> Result<Category> {
        self.categories.create(&mut self.store, &self.events, name)
    }

    pub fn update_category(&mut self, category: Category) -> Result<()> {
        self.categories
            .update(&mut self.store, &self.events, category)
    }

    pub fn delete_category(&mut self, id: Uuid) -> Result<()> {
        self.categories.delete(
            &mut self.store,
            &self.events,
            &mut self.tasks,
            &mut self.reminders,
            id,
        )
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.by_id(id)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.all()
    }

    // --- priorities ---

    pub fn create_priority(
        &mut self,
        name: impl Into<String>,
        is_default: bool,
    ) -> Result<PriorityLevel> {
        self.priorities
            .create(&mut self.store, &self.events, name, is_default)
    }

    pub fn update_priority(&mut self, level: PriorityLevel) -> Result<()> {
        self.priorities.update(&mut self.store, &self.events, level)
    }

    pub fn delete_priority(&mut self, id: Uuid) -> Result<()> {
        self.priorities.delete(
            &mut self.store,
            &self.events,
            &mut self.tasks,
            &mut self.reminders,
            id,
        )
    }

    pub fn default_priority(&self) -> Option<&PriorityLevel> {
        self.priorities.default_level()
    }

    pub fn priority(&self, id: Uuid) -> Option<&PriorityLevel> {
        self.priorities.by_id(id)
    }

    pub fn priorities(&self) -> Vec<PriorityLevel> {
        self.priorities.all()
    }

    // --- reminders ---

    pub fn create_reminder(
        &mut self,
        task_id: Uuid,
        kind: ReminderType,
        custom_date: Option<NaiveDate>,
    ) -> Result<Reminder> {
        self.create_reminder_at(task_id, kind, custom_date, Local::now().date_naive())
    }

    pub fn create_reminder_at(
        &mut self,
        task_id: Uuid,
        kind: ReminderType,
        custom_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Reminder> {
        let task = self
            .tasks
            .by_id(task_id)
            .cloned()
            .ok_or(TaskdeckError::NotFound(task_id))?;
        self.reminders
            .create_at(&mut self.store, &self.events, &task, kind, custom_date, today)
    }

    pub fn update_reminder(&mut self, reminder: Reminder) -> Result<()> {
        self.update_reminder_at(reminder, Local::now().date_naive())
    }

    pub fn update_reminder_at(&mut self, reminder: Reminder, today: NaiveDate) -> Result<()> {
        let task = self
            .tasks
            .by_id(reminder.task_id)
            .cloned()
            .ok_or(TaskdeckError::NotFound(reminder.task_id))?;
        self.reminders
            .update_at(&mut self.store, &self.events, &task, reminder, today)
    }

    pub fn delete_reminder(&mut self, id: Uuid) -> Result<()> {
        self.reminders.delete(&mut self.store, &self.events, id)
    }

    pub fn reminders(&self) -> Vec<Reminder> {
        self.reminders.all()
    }

    pub fn reminders_for_task(&self, task_id: Uuid) -> Vec<Reminder> {
        self.reminders.for_task(task_id)
    }

    // --- maintenance ---

    /// Re-run both reconciliation passes; returns the number of re-linked
    /// tasks.
    pub fn reconcile(&mut self) -> Result<usize> {
        let categories = reconcile::reconcile_categories(
            &mut self.store,
            &self.events,
            &mut self.tasks,
            &self.categories,
        )?;
        let priorities = reconcile::reconcile_priorities(
            &mut self.store,
            &self.events,
            &mut self.tasks,
            &self.priorities,
        )?;
        Ok(categories + priorities)
    }

    /// Write every entity list out, regardless of dirtiness.
    pub fn save_all(&mut self) -> Result<()> {
        self.store.save_tasks(&self.tasks.all())?;
        self.store.save_categories(&self.categories.all())?;
        self.store.save_priorities(&self.priorities.all())?;
        self.store.save_reminders(&self.reminders.all())?;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
