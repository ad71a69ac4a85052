use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Open,
    InProgress,
    Postponed,
    Completed,
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderType {
    OneDayBefore,
    OneWeekBefore,
    OneMonthBefore,
    CustomDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLevel {
    pub id: Uuid,
    pub name: String,
    pub is_default: bool,
}

impl PriorityLevel {
    pub fn new(name: impl Into<String>, is_default: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    // The category and priority are embedded copies, not references: a task
    // keeps the snapshot it was filed under until reconciliation re-links it.
    #[serde(default)]
    pub category: Option<Category>,
    pub priority: PriorityLevel,
    pub deadline: NaiveDate,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        priority: PriorityLevel,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            category: Some(category),
            priority,
            deadline,
            status: TaskStatus::Open,
        }
    }

    /// A task is overdue once its deadline has passed and it was never completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.deadline < today
    }
}

/// A reminder holds a weak reference to its task; it never owns the task and
/// is cascade-deleted with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub task_id: Uuid,
    pub kind: ReminderType,
    pub remind_on: NaiveDate,
}

impl Reminder {
    pub fn new(task_id: Uuid, kind: ReminderType, remind_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            kind,
            remind_on,
        }
    }
}
