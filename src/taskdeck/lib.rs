//! # Taskdeck Architecture
//!
//! Taskdeck is a **UI-agnostic task tracking library**: categories, priority
//! levels, deadline-driven tasks, and reminders, plus the rules that keep
//! those four entity sets consistent with each other. Any presentation layer
//! (a desktop app, a CLI) sits on top of the facade and subscribes to change
//! events; the core never touches a terminal or a widget toolkit.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Facade (api.rs)                                            │
//! │  - TaskSystem: startup wiring, dispatch, event bus          │
//! │  - The only type a UI needs to hold                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Services (service/*.rs)                                    │
//! │  - One service per entity kind, owning its id → entity map  │
//! │  - Cascades are explicit &mut parameters, never globals     │
//! │  - reconcile: repairs drift in the embedded copies          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - Abstract DataStore trait: a load/save pair per kind      │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Rules
//!
//! The interesting part of this crate is not CRUD but the cross-entity side
//! effects:
//!
//! - Deleting a category deletes every task filed under it, and each of
//!   those deletions drops the task's reminders.
//! - Deleting a priority level first reassigns every referencing task to the
//!   current default level; the default itself can never be edited or
//!   deleted.
//! - Completing a task removes its reminders, and no reminder can be created
//!   for a completed task.
//! - Tasks embed value *copies* of their category and priority. Renaming a
//!   canonical entity therefore does not touch existing tasks until the
//!   reconciliation pass re-links them by name.
//! - `Delayed` is computed, not chosen: the deadline check flips any
//!   non-completed task whose deadline has passed, and nothing else does.
//!
//! ## Error Policy
//!
//! Everything is synchronous and recoverable. Validation errors abort before
//! any mutation; storage errors surface *after* the in-memory mutation, which
//! is kept. The caller decides what to tell the user about durability.
//!
//! ## Module Overview
//!
//! - [`api`]: The `TaskSystem` facade, entry point for all operations
//! - [`service`]: Per-entity services and the reconciliation pass
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types
//! - [`events`]: Change notification for presentation layers
//! - [`config`]: Configuration management
//! - [`init`]: Data-directory discovery and system construction
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod init;
pub mod model;
pub mod service;
pub mod store;
