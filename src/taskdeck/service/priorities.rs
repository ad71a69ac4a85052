use std::collections::HashMap;

use log::{debug, info, warn};
use uuid::Uuid;

use super::reminders::ReminderService;
use super::tasks::TaskService;
use crate::error::{Result, TaskdeckError};
use crate::events::{ChangeAction, ChangeEvent, EntityKind, EventBus};
use crate::model::PriorityLevel;
use crate::store::DataStore;

/// The set created on a first run, first entry flagged as the default.
const BOOTSTRAP_LEVELS: [(&str, bool); 4] = [
    ("Default", true),
    ("High", false),
    ("Low", false),
    ("Urgent", false),
];

/// Owns priority levels and the single "default" designation. At most one
/// level is flagged default at any time: creating a new default un-flags the
/// previous one. The default level can neither be edited nor deleted; it is
/// the reassignment target when any other level goes away.
pub struct PriorityService {
    levels: HashMap<Uuid, PriorityLevel>,
}

impl PriorityService {
    pub fn load<S: DataStore>(store: &S) -> Result<Self> {
        let levels = store
            .load_priorities()?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();
        Ok(Self { levels })
    }

    /// Seed the built-in levels on a first run. No-op when anything was loaded.
    pub fn bootstrap<S: DataStore>(&mut self, store: &mut S, events: &EventBus) -> Result<()> {
        if !self.levels.is_empty() {
            return Ok(());
        }
        info!("no priority levels found, creating the built-in set");
        for (name, is_default) in BOOTSTRAP_LEVELS {
            let level = PriorityLevel::new(name, is_default);
            events.emit(ChangeEvent::new(
                EntityKind::Priority,
                ChangeAction::Created,
                level.id,
            ));
            self.levels.insert(level.id, level);
        }
        self.save(store)
    }

    pub fn create<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        name: impl Into<String>,
        is_default: bool,
    ) -> Result<PriorityLevel> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskdeckError::InvalidInput(
                "priority name must not be empty".to_string(),
            ));
        }
        if is_default {
            // The new default displaces the old one; the flag never lives on
            // two levels at once.
            for level in self.levels.values_mut() {
                level.is_default = false;
            }
        }
        let level = PriorityLevel::new(name, is_default);
        self.levels.insert(level.id, level.clone());
        events.emit(ChangeEvent::new(
            EntityKind::Priority,
            ChangeAction::Created,
            level.id,
        ));
        self.save(store)?;
        Ok(level)
    }

    /// Replace by id. The default level is immutable: both updating it and
    /// claiming the flag through an update are rejected.
    pub fn update<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        level: PriorityLevel,
    ) -> Result<()> {
        if level.is_default
            || self
                .levels
                .get(&level.id)
                .is_some_and(|existing| existing.is_default)
        {
            return Err(TaskdeckError::InvariantViolation(
                "the default priority level cannot be modified".to_string(),
            ));
        }
        let id = level.id;
        self.levels.insert(id, level);
        events.emit(ChangeEvent::new(EntityKind::Priority, ChangeAction::Updated, id));
        self.save(store)
    }

    /// Delete a non-default level. Every task embedding it is first handed a
    /// copy of the current default through a regular task update. Unknown ids
    /// are a no-op.
    pub fn delete<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        tasks: &mut TaskService,
        reminders: &mut ReminderService,
        id: Uuid,
    ) -> Result<()> {
        let Some(level) = self.levels.get(&id) else {
            return Ok(());
        };
        if level.is_default {
            return Err(TaskdeckError::InvariantViolation(
                "the default priority level cannot be deleted".to_string(),
            ));
        }

        let fallback = match self.levels.values().find(|l| l.is_default) {
            Some(l) => l.clone(),
            None => {
                warn!("no priority level is flagged as default, reassigning to an arbitrary level");
                self.levels
                    .values()
                    .find(|l| l.id != id)
                    .cloned()
                    .ok_or_else(|| {
                        TaskdeckError::InvariantViolation(
                            "cannot delete the last priority level".to_string(),
                        )
                    })?
            }
        };

        let referencing: Vec<_> = tasks
            .all()
            .into_iter()
            .filter(|t| t.priority.id == id)
            .collect();
        debug!(
            "deleting priority {} reassigns {} task(s) to {}",
            id,
            referencing.len(),
            fallback.name
        );
        for mut task in referencing {
            task.priority = fallback.clone();
            tasks.update(store, events, reminders, task)?;
        }

        self.levels.remove(&id);
        events.emit(ChangeEvent::new(EntityKind::Priority, ChangeAction::Deleted, id));
        self.save(store)
    }

    /// The level flagged as default. With no flagged level (corrupt data) an
    /// arbitrary existing level is returned as a best effort; `None` only
    /// when the store is empty.
    pub fn default_level(&self) -> Option<&PriorityLevel> {
        match self.levels.values().find(|l| l.is_default) {
            Some(level) => Some(level),
            None => {
                let fallback = self.levels.values().next();
                if fallback.is_some() {
                    warn!("no priority level is flagged as default, using an arbitrary fallback");
                }
                fallback
            }
        }
    }

    pub fn by_id(&self, id: Uuid) -> Option<&PriorityLevel> {
        self.levels.get(&id)
    }

    /// All levels, default first, then by name.
    pub fn all(&self) -> Vec<PriorityLevel> {
        self.snapshot()
    }

    fn snapshot(&self) -> Vec<PriorityLevel> {
        let mut levels: Vec<PriorityLevel> = self.levels.values().cloned().collect();
        levels.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        levels
    }

    fn save<S: DataStore>(&self, store: &mut S) -> Result<()> {
        store.save_priorities(&self.snapshot())
    }
}
