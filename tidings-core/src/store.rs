//! Task store
//!
//! Owns the task list, the draft form, the view selection and the inspected
//! task. Every operation that changes the task list writes the full list back
//! to storage before returning.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::draft::Draft;
use crate::error::Result;
use crate::storage::{DEFAULT_STORAGE_KEY, Storage};
use crate::task::{Category, NO_DESCRIPTION, Priority, ReminderOffset, Task};
use crate::view::{self, CategoryFilter, SortMode};

/// Explicitly owned task state backed by a [`Storage`]
pub struct TaskStore<S: Storage, C: Clock = SystemClock> {
    storage: S,
    clock: C,
    key: String,
    tasks: Vec<Task>,
    draft: Draft,
    selected_category: CategoryFilter,
    sort_by: SortMode,
    selected_id: Option<u64>,
}

impl<S: Storage> TaskStore<S, SystemClock> {
    /// Load the task list from `storage` under the default key
    pub fn load(storage: S) -> Result<Self> {
        Self::load_with(storage, SystemClock, DEFAULT_STORAGE_KEY)
    }
}

impl<S: Storage, C: Clock> TaskStore<S, C> {
    /// Load the task list stored under `key`
    ///
    /// A missing key yields the sample tasks. A present but malformed value is
    /// a parse error; there is no fallback.
    pub fn load_with(storage: S, clock: C, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let tasks = read_tasks(&storage, &key)?;

        Ok(Self {
            storage,
            clock,
            key,
            tasks,
            draft: Draft::new(),
            selected_category: CategoryFilter::All,
            sort_by: SortMode::Default,
            selected_id: None,
        })
    }

    /// Re-read the task list from storage
    ///
    /// Picks up writes made to the same key by other store instances since
    /// this one loaded. The draft, view selection and inspected id are kept.
    pub fn reload(&mut self) -> Result<()> {
        self.tasks = read_tasks(&self.storage, &self.key)?;
        Ok(())
    }

    /// Serialize the whole task list and overwrite the stored value
    pub fn save(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.tasks)?;
        self.storage.set_item(&self.key, &raw)?;
        debug!(count = self.tasks.len(), key = %self.key, "task list saved");
        Ok(())
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Set a named draft field from text; unknown names are ignored
    pub fn set_field_value(&mut self, field: &str, value: &str) -> Result<bool> {
        let now = self.clock.now();
        self.draft.set_field_value(field, value, now)
    }

    /// Commit the draft as a new task
    ///
    /// Returns the new task id, or `None` when the draft title is blank.
    pub fn add_todo(&mut self) -> Result<Option<u64>> {
        let title = self.draft.title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let description = match self.draft.description.trim() {
            "" => NO_DESCRIPTION.to_string(),
            d => d.to_string(),
        };

        let id = self.next_id();
        let task = Task::new(title)
            .with_id(id)
            .with_description(description)
            .with_category(self.draft.category)
            .with_priority(self.draft.priority)
            .with_due_date(self.draft.due_date)
            .with_reminder(self.draft.reminder);

        self.tasks.push(task);
        self.draft.reset();
        self.save()?;
        Ok(Some(id))
    }

    // Creation time in ms, bumped past the largest id if another task already holds it
    fn next_id(&self) -> u64 {
        let id = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        if self.tasks.iter().any(|t| t.id == id) {
            self.tasks.iter().map(|t| t.id).max().unwrap_or(id) + 1
        } else {
            id
        }
    }

    /// Flip completion for `id`; returns the new state, or `None` if absent
    pub fn toggle_todo(&mut self, id: u64) -> Result<Option<bool>> {
        let Some(task) = self.get_mut(id) else {
            return Ok(None);
        };
        task.toggle_complete();
        let completed = task.completed;
        self.save()?;
        Ok(Some(completed))
    }

    /// Change the reminder for `id` and re-arm its notification
    pub fn update_todo_reminder(&mut self, id: u64, reminder: ReminderOffset) -> Result<bool> {
        let Some(task) = self.get_mut(id) else {
            return Ok(false);
        };
        task.set_reminder(reminder);
        self.save()?;
        Ok(true)
    }

    /// Remove the task with `id`, clearing the selection if it was selected
    pub fn delete_todo(&mut self, id: u64) -> Result<Option<Task>> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = self.tasks.remove(pos);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        self.save()?;
        Ok(Some(removed))
    }

    /// Remove every completed task, returns count of removed tasks
    pub fn clear_completed(&mut self) -> Result<usize> {
        if self.selected_todo().is_some_and(|t| t.completed) {
            self.selected_id = None;
        }

        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Mark tasks as notified after their reminder fired
    pub fn mark_notified(&mut self, ids: &[u64]) -> Result<usize> {
        let mut changed = 0;
        for task in self.tasks.iter_mut().filter(|t| ids.contains(&t.id)) {
            if !task.notified {
                task.notified = true;
                changed += 1;
            }
        }
        if changed > 0 {
            self.save()?;
        }
        Ok(changed)
    }

    /// Inspect a task; the id is not validated
    pub fn show_todo_details(&mut self, id: u64) {
        self.selected_id = Some(id);
    }

    pub fn close_details(&mut self) {
        self.selected_id = None;
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected_id
    }

    pub fn selected_todo(&self) -> Option<&Task> {
        self.selected_id.and_then(|id| self.get(id))
    }

    pub fn selected_category(&self) -> CategoryFilter {
        self.selected_category
    }

    pub fn set_selected_category(&mut self, category: CategoryFilter) {
        self.selected_category = category;
    }

    pub fn sort_by(&self) -> SortMode {
        self.sort_by
    }

    pub fn set_sort_by(&mut self, sort: SortMode) {
        self.sort_by = sort;
    }

    /// The derived view for the current category and sort selection
    pub fn filtered_and_sorted_todos(&self) -> Vec<&Task> {
        view::filtered_and_sorted(&self.tasks, self.selected_category, self.sort_by)
    }

    /// Number of tasks not yet completed
    pub fn remaining_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}

fn read_tasks<S: Storage>(storage: &S, key: &str) -> Result<Vec<Task>> {
    match storage.get_item(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => {
            debug!(%key, "no stored tasks, using sample data");
            Ok(seed_tasks())
        }
    }
}

/// Sample tasks shown on first launch
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new("Learn Rust")
            .with_id(1)
            .with_description("Work through ownership, borrowing and traits")
            .with_category(Category::Study)
            .with_priority(Priority::High),
        Task::new("Build a task tracker")
            .with_id(2)
            .with_description("Implement a complete task tracker with reminders")
            .with_category(Category::Work)
            .with_priority(Priority::Medium)
            .with_completed(true),
        Task::new("Add new features")
            .with_id(3)
            .with_description("Give tasks titles and descriptions")
            .with_category(Category::Work)
            .with_priority(Priority::Medium),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::CoreError;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
            .single()
            .unwrap()
    }

    fn seeded() -> TaskStore<MemoryStorage, FixedClock> {
        TaskStore::load_with(MemoryStorage::new(), FixedClock(noon()), "todos").unwrap()
    }

    fn stored(store: &TaskStore<MemoryStorage, FixedClock>) -> Vec<Task> {
        serde_json::from_str(store.storage().get("todos").expect("persisted")).unwrap()
    }

    #[test]
    fn test_empty_storage_loads_seed() {
        let store = seeded();

        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.remaining_count(), 2);
        assert!(store.storage().get("todos").is_none());
    }

    #[test]
    fn test_malformed_storage_is_fatal() {
        let storage = MemoryStorage::with_item("todos", "{not json");
        let result = TaskStore::load_with(storage, FixedClock(noon()), "todos");

        assert!(matches!(result, Err(CoreError::Parse { .. })));
    }

    #[test]
    fn test_schema_mismatch_is_fatal() {
        let storage = MemoryStorage::with_item("todos", r#"[{"id":"one"}]"#);
        assert!(TaskStore::load_with(storage, FixedClock(noon()), "todos").is_err());
    }

    #[test]
    fn test_add_todo() {
        let mut store = seeded();
        store.set_field_value("title", "  Write tests  ").unwrap();
        store.set_field_value("category", "life").unwrap();
        store.set_field_value("priority", "high").unwrap();
        store.set_field_value("reminder", "15").unwrap();

        let id = store.add_todo().unwrap().expect("task created");

        assert_eq!(id, noon().timestamp_millis() as u64);
        assert_eq!(store.tasks().len(), 4);

        let task = store.get(id).unwrap();
        assert_eq!(task.title, "Write tests");
        assert_eq!(task.description, NO_DESCRIPTION);
        assert_eq!(task.category, Category::Life);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.reminder, ReminderOffset::FifteenMinutes);
        assert!(!task.completed);
        assert!(!task.notified);

        // Draft cleared except category and priority
        assert!(store.draft().title.is_empty());
        assert_eq!(store.draft().reminder, ReminderOffset::Off);
        assert_eq!(store.draft().category, Category::Life);
        assert_eq!(store.draft().priority, Priority::High);

        assert_eq!(stored(&store).len(), 4);
    }

    #[test]
    fn test_add_blank_title_is_noop() {
        let mut store = seeded();
        store.set_field_value("title", "   ").unwrap();

        assert_eq!(store.add_todo().unwrap(), None);
        assert_eq!(store.tasks().len(), 3);
        assert!(store.storage().get("todos").is_none());
    }

    #[test]
    fn test_add_same_millisecond_keeps_ids_unique() {
        let mut store = seeded();
        store.draft_mut().title = "First".into();
        let first = store.add_todo().unwrap().unwrap();
        store.draft_mut().title = "Second".into();
        let second = store.add_todo().unwrap().unwrap();

        assert_ne!(first, second);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_toggle_twice() {
        let mut store = seeded();

        assert_eq!(store.toggle_todo(1).unwrap(), Some(true));
        assert!(store.get(1).unwrap().notified);

        assert_eq!(store.toggle_todo(1).unwrap(), Some(false));
        let task = store.get(1).unwrap();
        assert!(!task.completed);
        assert!(task.notified);

        assert!(stored(&store)[0].notified);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut store = seeded();
        assert_eq!(store.toggle_todo(99).unwrap(), None);
        assert!(store.storage().get("todos").is_none());
    }

    #[test]
    fn test_update_reminder_resets_notified() {
        let mut store = seeded();
        store.toggle_todo(2).unwrap();
        store.toggle_todo(2).unwrap();
        assert!(store.get(2).unwrap().notified);

        assert!(store.update_todo_reminder(2, ReminderOffset::OneHour).unwrap());
        let task = store.get(2).unwrap();
        assert_eq!(task.reminder, ReminderOffset::OneHour);
        assert!(!task.notified);

        assert!(!store.update_todo_reminder(99, ReminderOffset::OneHour).unwrap());
    }

    #[test]
    fn test_update_reminder_on_completed_task() {
        let mut store = seeded();
        store.toggle_todo(1).unwrap();

        store.update_todo_reminder(1, ReminderOffset::FiveMinutes).unwrap();
        let task = store.get(1).unwrap();
        assert!(task.completed);
        assert!(!task.notified);
    }

    #[test]
    fn test_delete_clears_selection_only_when_selected() {
        let mut store = seeded();
        store.show_todo_details(1);

        let removed = store.delete_todo(3).unwrap().unwrap();
        assert_eq!(removed.id, 3);
        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.selected_id(), Some(1));

        store.delete_todo(1).unwrap();
        assert_eq!(store.selected_id(), None);
        assert_eq!(stored(&store).len(), 1);

        assert!(store.delete_todo(42).unwrap().is_none());
    }

    #[test]
    fn test_clear_completed() {
        let mut store = seeded();
        store.show_todo_details(2);

        assert_eq!(store.clear_completed().unwrap(), 1);
        assert!(store.tasks().iter().all(|t| !t.completed));
        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.selected_id(), None);

        assert_eq!(store.clear_completed().unwrap(), 0);
    }

    #[test]
    fn test_clear_completed_keeps_open_selection() {
        let mut store = seeded();
        store.show_todo_details(3);
        store.clear_completed().unwrap();

        assert_eq!(store.selected_todo().map(|t| t.id), Some(3));
    }

    #[test]
    fn test_show_details_is_unvalidated() {
        let mut store = seeded();
        store.show_todo_details(777);

        assert_eq!(store.selected_id(), Some(777));
        assert!(store.selected_todo().is_none());

        store.close_details();
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_derived_view_uses_selection() {
        let mut store = seeded();
        store.set_selected_category(CategoryFilter::Only(Category::Work));

        let ids: Vec<u64> = store.filtered_and_sorted_todos().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2]);

        store.set_sort_by(SortMode::Priority);
        store.set_selected_category(CategoryFilter::All);
        assert_eq!(store.filtered_and_sorted_todos()[0].id, 1);
    }

    #[test]
    fn test_mark_notified() {
        let mut store = seeded();

        assert_eq!(store.mark_notified(&[1, 3, 99]).unwrap(), 2);
        assert!(store.get(1).unwrap().notified);
        assert!(stored(&store)[2].notified);

        assert_eq!(store.mark_notified(&[1]).unwrap(), 0);
    }

    #[test]
    fn test_reload_roundtrip() {
        let mut store = seeded();
        store.draft_mut().title = "Due soon".into();
        store.draft_mut().due_date = Some(noon() + Duration::minutes(45));
        store.draft_mut().reminder = ReminderOffset::ThirtyMinutes;
        store.add_todo().unwrap();
        store.toggle_todo(3).unwrap();

        let original = store.tasks().to_vec();
        let storage = store.storage().clone();
        let reloaded = TaskStore::load_with(storage, FixedClock(noon()), "todos").unwrap();

        assert_eq!(reloaded.tasks(), original.as_slice());
    }

    /// Storage handle shared by several stores, like two processes on one file
    #[derive(Clone, Default)]
    struct SharedStorage(std::rc::Rc<std::cell::RefCell<MemoryStorage>>);

    impl Storage for SharedStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.0.borrow().get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().set_item(key, value)
        }
    }

    #[test]
    fn test_reload_sees_other_writers_and_keeps_draft() {
        let shared = SharedStorage::default();
        let mut watcher = TaskStore::load_with(shared.clone(), FixedClock(noon()), "todos").unwrap();
        let mut writer = TaskStore::load_with(shared, FixedClock(noon()), "todos").unwrap();

        watcher.draft_mut().title = "Half typed".into();
        watcher.show_todo_details(2);

        writer.draft_mut().title = "Added elsewhere".into();
        let added = writer.add_todo().unwrap().unwrap();
        writer.delete_todo(1).unwrap();

        watcher.reload().unwrap();
        assert!(watcher.get(added).is_some());
        assert!(watcher.get(1).is_none());
        assert_eq!(watcher.draft().title, "Half typed");
        assert_eq!(watcher.selected_id(), Some(2));

        // A write from the reloaded store keeps the other writer's changes
        watcher.mark_notified(&[3]).unwrap();
        writer.reload().unwrap();
        assert!(writer.get(added).is_some());
        assert!(writer.get(3).unwrap().notified);
    }
}
