use std::collections::HashMap;

use chrono::{Days, Local, Months, NaiveDate};
use log::debug;
use uuid::Uuid;

use crate::error::{Result, TaskdeckError};
use crate::events::{ChangeAction, ChangeEvent, EntityKind, EventBus};
use crate::model::{Reminder, ReminderType, Task, TaskStatus};
use crate::store::DataStore;

/// Owns reminders. Each reminder points at a task by id only; the task side
/// never stores its reminders, which keeps the serialized forms cycle-free.
pub struct ReminderService {
    reminders: HashMap<Uuid, Reminder>,
}

/// Resolve the concrete reminder date for a reminder type.
///
/// The relative types count back from the deadline (one day, seven days, one
/// calendar month); `CustomDate` requires an explicit date.
pub fn compute_reminder_date(
    deadline: NaiveDate,
    kind: ReminderType,
    custom_date: Option<NaiveDate>,
) -> Result<NaiveDate> {
    let out_of_range = || TaskdeckError::InvalidInput("deadline is out of range".to_string());
    match kind {
        ReminderType::OneDayBefore => deadline.pred_opt().ok_or_else(out_of_range),
        ReminderType::OneWeekBefore => deadline.checked_sub_days(Days::new(7)).ok_or_else(out_of_range),
        ReminderType::OneMonthBefore => deadline
            .checked_sub_months(Months::new(1))
            .ok_or_else(out_of_range),
        ReminderType::CustomDate => custom_date.ok_or_else(|| {
            TaskdeckError::InvalidInput("a custom reminder requires a date".to_string())
        }),
    }
}

fn validate_reminder_date(remind_on: NaiveDate, deadline: NaiveDate, today: NaiveDate) -> Result<()> {
    if remind_on > deadline {
        return Err(TaskdeckError::InvalidInput(
            "reminder date cannot be after the task deadline".to_string(),
        ));
    }
    if remind_on < today {
        return Err(TaskdeckError::InvalidInput(
            "reminder date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

impl ReminderService {
    pub fn load<S: DataStore>(store: &S) -> Result<Self> {
        let reminders = store
            .load_reminders()?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();
        Ok(Self { reminders })
    }

    /// Create a reminder for `task`, dated according to `kind`.
    ///
    /// Fails with `InvalidState` for a completed task and with `InvalidInput`
    /// when the computed date falls after the deadline or before today.
    pub fn create<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        task: &Task,
        kind: ReminderType,
        custom_date: Option<NaiveDate>,
    ) -> Result<Reminder> {
        self.create_at(store, events, task, kind, custom_date, Local::now().date_naive())
    }

    pub fn create_at<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        task: &Task,
        kind: ReminderType,
        custom_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Reminder> {
        if task.status == TaskStatus::Completed {
            return Err(TaskdeckError::InvalidState(
                "cannot create a reminder for a completed task".to_string(),
            ));
        }
        let remind_on = compute_reminder_date(task.deadline, kind, custom_date)?;
        validate_reminder_date(remind_on, task.deadline, today)?;

        let reminder = Reminder::new(task.id, kind, remind_on);
        self.reminders.insert(reminder.id, reminder.clone());
        events.emit(ChangeEvent::new(
            EntityKind::Reminder,
            ChangeAction::Created,
            reminder.id,
        ));
        self.save(store)?;
        Ok(reminder)
    }

    /// Replace an existing reminder. The owning task is passed in so the new
    /// date can be re-validated against its deadline.
    pub fn update<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        task: &Task,
        reminder: Reminder,
    ) -> Result<()> {
        self.update_at(store, events, task, reminder, Local::now().date_naive())
    }

    pub fn update_at<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        task: &Task,
        reminder: Reminder,
        today: NaiveDate,
    ) -> Result<()> {
        if !self.reminders.contains_key(&reminder.id) {
            return Err(TaskdeckError::NotFound(reminder.id));
        }
        validate_reminder_date(reminder.remind_on, task.deadline, today)?;

        let id = reminder.id;
        self.reminders.insert(id, reminder);
        events.emit(ChangeEvent::new(EntityKind::Reminder, ChangeAction::Updated, id));
        self.save(store)
    }

    pub fn delete<S: DataStore>(&mut self, store: &mut S, events: &EventBus, id: Uuid) -> Result<()> {
        if self.reminders.remove(&id).is_none() {
            return Ok(());
        }
        events.emit(ChangeEvent::new(EntityKind::Reminder, ChangeAction::Deleted, id));
        self.save(store)
    }

    /// Remove every reminder pointing at `task_id`. Idempotent: when nothing
    /// matches, nothing is written either.
    pub fn delete_for_task<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        task_id: Uuid,
    ) -> Result<()> {
        let doomed: Vec<Uuid> = self
            .reminders
            .values()
            .filter(|r| r.task_id == task_id)
            .map(|r| r.id)
            .collect();
        if doomed.is_empty() {
            return Ok(());
        }
        debug!("removing {} reminder(s) for task {}", doomed.len(), task_id);
        for id in &doomed {
            self.reminders.remove(id);
            events.emit(ChangeEvent::new(EntityKind::Reminder, ChangeAction::Deleted, *id));
        }
        self.save(store)
    }

    pub fn by_id(&self, id: Uuid) -> Option<&Reminder> {
        self.reminders.get(&id)
    }

    pub fn all(&self) -> Vec<Reminder> {
        self.snapshot()
    }

    pub fn for_task(&self, task_id: Uuid) -> Vec<Reminder> {
        let mut matching: Vec<Reminder> = self
            .reminders
            .values()
            .filter(|r| r.task_id == task_id)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.remind_on);
        matching
    }

    fn snapshot(&self) -> Vec<Reminder> {
        let mut reminders: Vec<Reminder> = self.reminders.values().cloned().collect();
        reminders.sort_by(|a, b| a.remind_on.cmp(&b.remind_on).then_with(|| a.id.cmp(&b.id)));
        reminders
    }

    fn save<S: DataStore>(&self, store: &mut S) -> Result<()> {
        store.save_reminders(&self.snapshot())
    }
}
