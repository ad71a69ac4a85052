//! # Entity Services
//!
//! One service per entity kind, each owning the in-memory map of id to
//! entity and the rules that keep the maps consistent under mutation.
//! Cross-service side effects (cascading deletes, default-priority
//! reassignment, completion clearing reminders) are taken as explicit
//! `&mut` parameters on the operations that need them. A service never
//! reaches for another one through shared or global state, and a cascade
//! runs to completion inside a single call.
//!
//! Every mutating operation persists through the [`DataStore`] it is handed.
//! A failed save is surfaced to the caller but the in-memory mutation stays
//! applied; durability, not consistency, is what the error reports.
//!
//! [`DataStore`]: crate::store::DataStore

pub mod categories;
pub mod priorities;
pub mod reconcile;
pub mod reminders;
pub mod tasks;

pub use categories::CategoryService;
pub use priorities::PriorityService;
pub use reminders::ReminderService;
pub use tasks::{TaskQuery, TaskService};
