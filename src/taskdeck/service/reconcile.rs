//! Repair pass for the category and priority copies embedded in tasks.
//!
//! A task embeds value copies, so renaming a canonical category or priority
//! leaves the tasks that were filed under it pointing at a stale snapshot.
//! Reconciliation walks every task and re-links each embedded copy to the
//! canonical entity whose name matches case-insensitively; name, not the
//! generated id, is the natural key here. Copies with no surviving canonical
//! match are deliberately left as they are: they record what the task was
//! filed under, and nothing better exists to replace them with.
//!
//! Runs once at startup after every store has loaded, and on demand from the
//! facade.

use log::debug;

use super::categories::CategoryService;
use super::priorities::PriorityService;
use super::tasks::TaskService;
use crate::error::Result;
use crate::events::{ChangeAction, ChangeEvent, EntityKind, EventBus};
use crate::store::DataStore;

/// Re-link every task's embedded category to the canonical one with the same
/// name. Returns how many tasks changed; a single batched task save happens
/// only when that count is non-zero.
pub fn reconcile_categories<S: DataStore>(
    store: &mut S,
    events: &EventBus,
    tasks: &mut TaskService,
    categories: &CategoryService,
) -> Result<usize> {
    let canonical = categories.all();
    let mut changed = Vec::new();
    for task in tasks.values_mut() {
        let Some(embedded) = task.category.as_ref() else {
            continue;
        };
        let Some(found) = canonical
            .iter()
            .find(|c| c.name.to_lowercase() == embedded.name.to_lowercase())
        else {
            continue;
        };
        if embedded != found {
            task.category = Some(found.clone());
            changed.push(task.id);
        }
    }
    finish(store, events, tasks, changed, "categories")
}

/// Same pass keyed on priority level names.
pub fn reconcile_priorities<S: DataStore>(
    store: &mut S,
    events: &EventBus,
    tasks: &mut TaskService,
    priorities: &PriorityService,
) -> Result<usize> {
    let canonical = priorities.all();
    let mut changed = Vec::new();
    for task in tasks.values_mut() {
        let Some(found) = canonical
            .iter()
            .find(|l| l.name.to_lowercase() == task.priority.name.to_lowercase())
        else {
            continue;
        };
        if &task.priority != found {
            task.priority = found.clone();
            changed.push(task.id);
        }
    }
    finish(store, events, tasks, changed, "priorities")
}

fn finish<S: DataStore>(
    store: &mut S,
    events: &EventBus,
    tasks: &TaskService,
    changed: Vec<uuid::Uuid>,
    what: &str,
) -> Result<usize> {
    if changed.is_empty() {
        return Ok(0);
    }
    debug!("re-linked {} task(s) to canonical {}", changed.len(), what);
    for id in &changed {
        events.emit(ChangeEvent::new(EntityKind::Task, ChangeAction::Updated, *id));
    }
    tasks.save(store)?;
    Ok(changed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, PriorityLevel};
    use crate::store::memory::fixtures::*;
    use crate::store::memory::InMemoryStore;

    struct Fixture {
        store: InMemoryStore,
        events: EventBus,
        tasks: TaskService,
        categories: CategoryService,
        priorities: PriorityService,
    }

    impl Fixture {
        fn new() -> Self {
            let store = InMemoryStore::new();
            Self {
                tasks: TaskService::load(&store).unwrap(),
                categories: CategoryService::load(&store).unwrap(),
                priorities: PriorityService::load(&store).unwrap(),
                events: EventBus::new(),
                store,
            }
        }
    }

    #[test]
    fn relinks_embedded_categories_by_name_case_insensitively() {
        let mut fx = Fixture::new();
        let canonical = fx
            .categories
            .create(&mut fx.store, &fx.events, "Work")
            .unwrap();
        // The task was filed under a differently-cased, differently-id'd copy.
        let stale = Category {
            id: uuid::Uuid::new_v4(),
            name: "WORK".to_string(),
        };
        let normal = level("Default", true);
        let task = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "Report",
                "",
                stale,
                normal,
                date(2024, 1, 10),
            )
            .unwrap();

        let changed =
            reconcile_categories(&mut fx.store, &fx.events, &mut fx.tasks, &fx.categories)
                .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            fx.tasks.by_id(task.id).unwrap().category.as_ref().unwrap(),
            &canonical
        );
    }

    #[test]
    fn stale_copies_without_a_canonical_match_stay_untouched() {
        let mut fx = Fixture::new();
        fx.categories
            .create(&mut fx.store, &fx.events, "Work")
            .unwrap();
        let orphaned = category("Archived");
        let normal = level("Default", true);
        let task = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "Old report",
                "",
                orphaned.clone(),
                normal,
                date(2024, 1, 10),
            )
            .unwrap();

        let changed =
            reconcile_categories(&mut fx.store, &fx.events, &mut fx.tasks, &fx.categories)
                .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(
            fx.tasks.by_id(task.id).unwrap().category.as_ref().unwrap(),
            &orphaned
        );
    }

    #[test]
    fn relinks_priorities_and_batches_the_save() {
        let mut fx = Fixture::new();
        fx.priorities.bootstrap(&mut fx.store, &fx.events).unwrap();
        let canonical_high = fx
            .priorities
            .all()
            .into_iter()
            .find(|l| l.name == "High")
            .unwrap();
        let work = category("Work");
        // Two tasks with stale copies of "High", one already canonical.
        let stale = PriorityLevel {
            id: uuid::Uuid::new_v4(),
            name: "high".to_string(),
            is_default: false,
        };
        let a = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "A",
                "",
                work.clone(),
                stale.clone(),
                date(2024, 1, 10),
            )
            .unwrap();
        let b = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "B",
                "",
                work.clone(),
                stale,
                date(2024, 1, 11),
            )
            .unwrap();
        fx.tasks
            .create(
                &mut fx.store,
                &fx.events,
                "C",
                "",
                work,
                canonical_high.clone(),
                date(2024, 1, 12),
            )
            .unwrap();

        let saves_before = fx.store.save_count(EntityKind::Task);
        let changed =
            reconcile_priorities(&mut fx.store, &fx.events, &mut fx.tasks, &fx.priorities)
                .unwrap();
        assert_eq!(changed, 2);
        assert_eq!(fx.store.save_count(EntityKind::Task), saves_before + 1);
        assert_eq!(fx.tasks.by_id(a.id).unwrap().priority, canonical_high);
        assert_eq!(fx.tasks.by_id(b.id).unwrap().priority, canonical_high);

        // A second pass finds nothing to do.
        let changed =
            reconcile_priorities(&mut fx.store, &fx.events, &mut fx.tasks, &fx.priorities)
                .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(fx.store.save_count(EntityKind::Task), saves_before + 1);
    }
}
