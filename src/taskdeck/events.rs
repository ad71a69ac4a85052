//! Change notification for the presentation layer.
//!
//! Services emit a [`ChangeEvent`] for every create/update/delete, including
//! the ones triggered by cascades. A UI subscribes a [`ChangeListener`] to the
//! [`EventBus`] and refreshes whatever it renders for that entity kind; the
//! core never knows about any specific UI-binding mechanism.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Category,
    Priority,
    Reminder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub entity: EntityKind,
    pub action: ChangeAction,
    pub id: Uuid,
}

impl ChangeEvent {
    pub fn new(entity: EntityKind, action: ChangeAction, id: Uuid) -> Self {
        Self { entity, action, id }
    }
}

pub trait ChangeListener {
    fn on_change(&self, event: &ChangeEvent);
}

/// Listener registry. Emission is synchronous and in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: ChangeEvent) {
        for listener in &self.listeners {
            listener.on_change(&event);
        }
    }
}
