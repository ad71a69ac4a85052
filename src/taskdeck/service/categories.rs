use std::collections::HashMap;

use log::{debug, info};
use uuid::Uuid;

use super::reminders::ReminderService;
use super::tasks::TaskService;
use crate::error::{Result, TaskdeckError};
use crate::events::{ChangeAction, ChangeEvent, EntityKind, EventBus};
use crate::model::Category;
use crate::store::DataStore;

/// The set created on a first run with no saved categories.
const BOOTSTRAP_CATEGORIES: [&str; 5] = ["Work", "Personal", "Study", "Health", "Finance"];

pub struct CategoryService {
    categories: HashMap<Uuid, Category>,
}

impl CategoryService {
    pub fn load<S: DataStore>(store: &S) -> Result<Self> {
        let categories = store
            .load_categories()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        Ok(Self { categories })
    }

    /// Seed the built-in categories on a first run. No-op when anything was
    /// loaded.
    pub fn bootstrap<S: DataStore>(&mut self, store: &mut S, events: &EventBus) -> Result<()> {
        if !self.categories.is_empty() {
            return Ok(());
        }
        info!("no categories found, creating the built-in set");
        for name in BOOTSTRAP_CATEGORIES {
            let category = Category::new(name);
            events.emit(ChangeEvent::new(
                EntityKind::Category,
                ChangeAction::Created,
                category.id,
            ));
            self.categories.insert(category.id, category);
        }
        self.save(store)
    }

    pub fn create<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        name: impl Into<String>,
    ) -> Result<Category> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskdeckError::InvalidInput(
                "category name must not be empty".to_string(),
            ));
        }
        let category = Category::new(name);
        self.categories.insert(category.id, category.clone());
        events.emit(ChangeEvent::new(
            EntityKind::Category,
            ChangeAction::Created,
            category.id,
        ));
        self.save(store)?;
        Ok(category)
    }

    /// Replace by id. Tasks embedding the old copy are NOT touched here;
    /// reconciliation re-links them by name.
    pub fn update<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        category: Category,
    ) -> Result<()> {
        let id = category.id;
        self.categories.insert(id, category);
        events.emit(ChangeEvent::new(EntityKind::Category, ChangeAction::Updated, id));
        self.save(store)
    }

    /// Delete a category and every task filed under it (matched by the
    /// embedded copy's id), which in turn drops those tasks' reminders.
    /// Unknown ids are a no-op.
    pub fn delete<S: DataStore>(
        &mut self,
        store: &mut S,
        events: &EventBus,
        tasks: &mut TaskService,
        reminders: &mut ReminderService,
        id: Uuid,
    ) -> Result<()> {
        if !self.categories.contains_key(&id) {
            return Ok(());
        }

        let doomed: Vec<Uuid> = tasks
            .all()
            .into_iter()
            .filter(|t| t.category.as_ref().is_some_and(|c| c.id == id))
            .map(|t| t.id)
            .collect();
        debug!("deleting category {} cascades to {} task(s)", id, doomed.len());
        for task_id in doomed {
            tasks.delete(store, events, reminders, task_id)?;
        }

        self.categories.remove(&id);
        events.emit(ChangeEvent::new(EntityKind::Category, ChangeAction::Deleted, id));
        self.save(store)
    }

    pub fn by_id(&self, id: Uuid) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// All categories, ordered by name.
    pub fn all(&self) -> Vec<Category> {
        self.snapshot()
    }

    fn snapshot(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        categories
    }

    fn save<S: DataStore>(&self, store: &mut S) -> Result<()> {
        store.save_categories(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReminderType;
    use crate::store::memory::fixtures::*;
    use crate::store::memory::InMemoryStore;

    struct Fixture {
        store: InMemoryStore,
        events: EventBus,
        categories: CategoryService,
        tasks: TaskService,
        reminders: ReminderService,
    }

    impl Fixture {
        fn new() -> Self {
            let store = InMemoryStore::new();
            Self {
                categories: CategoryService::load(&store).unwrap(),
                tasks: TaskService::load(&store).unwrap(),
                reminders: ReminderService::load(&store).unwrap(),
                events: EventBus::new(),
                store,
            }
        }
    }

    #[test]
    fn bootstrap_seeds_and_persists_the_builtin_set() {
        let mut fx = Fixture::new();
        fx.categories.bootstrap(&mut fx.store, &fx.events).unwrap();

        let names: Vec<String> = fx.categories.all().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Finance", "Health", "Personal", "Study", "Work"]);
        assert_eq!(fx.store.load_categories().unwrap().len(), 5);

        // Second bootstrap leaves the set alone.
        fx.categories.bootstrap(&mut fx.store, &fx.events).unwrap();
        assert_eq!(fx.categories.all().len(), 5);
    }

    #[test]
    fn create_rejects_blank_names() {
        let mut fx = Fixture::new();
        let err = fx
            .categories
            .create(&mut fx.store, &fx.events, "  ")
            .unwrap_err();
        assert!(matches!(err, TaskdeckError::InvalidInput(_)));
    }

    #[test]
    fn delete_cascades_through_tasks_to_reminders() {
        let mut fx = Fixture::new();
        let work = fx
            .categories
            .create(&mut fx.store, &fx.events, "Work")
            .unwrap();
        let keep = fx
            .categories
            .create(&mut fx.store, &fx.events, "Personal")
            .unwrap();
        let normal = level("Default", true);

        let doomed_a = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "Report",
                "",
                work.clone(),
                normal.clone(),
                date(2024, 1, 10),
            )
            .unwrap();
        let doomed_b = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "Slides",
                "",
                work.clone(),
                normal.clone(),
                date(2024, 1, 12),
            )
            .unwrap();
        let survivor = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "Groceries",
                "",
                keep.clone(),
                normal,
                date(2024, 1, 8),
            )
            .unwrap();
        fx.reminders
            .create_at(
                &mut fx.store,
                &fx.events,
                &doomed_a,
                ReminderType::OneDayBefore,
                None,
                date(2024, 1, 1),
            )
            .unwrap();
        fx.reminders
            .create_at(
                &mut fx.store,
                &fx.events,
                &survivor,
                ReminderType::OneDayBefore,
                None,
                date(2024, 1, 1),
            )
            .unwrap();

        fx.categories
            .delete(
                &mut fx.store,
                &fx.events,
                &mut fx.tasks,
                &mut fx.reminders,
                work.id,
            )
            .unwrap();

        assert!(fx.categories.by_id(work.id).is_none());
        assert!(fx.tasks.by_id(doomed_a.id).is_none());
        assert!(fx.tasks.by_id(doomed_b.id).is_none());
        assert!(fx.tasks.by_id(survivor.id).is_some());
        assert!(fx.reminders.for_task(doomed_a.id).is_empty());
        assert_eq!(fx.reminders.for_task(survivor.id).len(), 1);
    }

    #[test]
    fn delete_matches_the_embedded_id_even_when_the_name_drifted() {
        let mut fx = Fixture::new();
        let work = fx
            .categories
            .create(&mut fx.store, &fx.events, "Work")
            .unwrap();
        let normal = level("Default", true);
        let task = fx
            .tasks
            .create(
                &mut fx.store,
                &fx.events,
                "Report",
                "",
                work.clone(),
                normal,
                date(2024, 1, 10),
            )
            .unwrap();

        // Rename the canonical category without reconciling the task.
        let mut renamed = work.clone();
        renamed.name = "Office".to_string();
        fx.categories
            .update(&mut fx.store, &fx.events, renamed)
            .unwrap();

        fx.categories
            .delete(
                &mut fx.store,
                &fx.events,
                &mut fx.tasks,
                &mut fx.reminders,
                work.id,
            )
            .unwrap();
        assert!(fx.tasks.by_id(task.id).is_none());
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        let mut fx = Fixture::new();
        fx.categories
            .delete(
                &mut fx.store,
                &fx.events,
                &mut fx.tasks,
                &mut fx.reminders,
                Uuid::new_v4(),
            )
            .unwrap();
        assert_eq!(fx.store.save_count(EntityKind::Category), 0);
    }
}
