// Task store: the authoritative in-memory list and its persistence

use crate::codec;
use crate::config::StoreKeys;
use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::models::Task;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// The single last-deleted task, kept so a delete can be undone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedTask {
    pub index: usize,
    pub task: Task,
}

/// Ordered task list backed by a key-value store
///
/// The in-memory list is the source of truth. Every mutation re-serializes
/// the whole list under the tasks key; a failed write is logged and the
/// mutation still stands. The undo slot follows the same rule: it is held in
/// memory and written through to the undo key.
pub struct TaskStore<K: KeyValueStore> {
    kv: K,
    keys: StoreKeys,
    tasks: Vec<Task>,
    last_deleted: Option<DeletedTask>,
}

impl<K: KeyValueStore> TaskStore<K> {
    /// Validate the key layout and load whatever list is stored
    pub fn open(kv: K, keys: StoreKeys) -> Result<Self> {
        keys.validate()?;

        let mut store = Self {
            kv,
            keys,
            tasks: Vec::new(),
            last_deleted: None,
        };
        store.tasks = store.load();
        store.last_deleted = store.load_undo_slot();
        Ok(store)
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut K {
        &mut self.kv
    }

    pub fn into_inner(self) -> K {
        self.kv
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Read the stored list without touching the in-memory one
    ///
    /// Never fails: a missing value, an unreadable value, or a string that is
    /// not a JSON array all produce an empty list and a log line.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.kv.get_string(&self.keys.namespace, &self.keys.tasks_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.keys.tasks_key, "No stored tasks");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.keys.tasks_key, error = ?e, "Failed to read stored tasks, starting empty");
                return Vec::new();
            }
        };

        match codec::decode_tasks(&raw) {
            Ok(tasks) => {
                info!(count = tasks.len(), "Loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(error = ?e, "Stored task list is not parseable, starting empty");
                Vec::new()
            }
        }
    }

    /// Write the current list, overwriting the previous value
    pub fn save(&mut self) -> Result<()> {
        let encoded = codec::encode_tasks(&self.tasks)?;
        self.kv
            .put_string(&self.keys.namespace, &self.keys.tasks_key, &encoded)?;
        debug!(count = self.tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Save after a mutation; failures are logged, never returned
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            error!(error = ?e, "Failed to save tasks, keeping in-memory list");
        }
    }

    /// Save and push any buffered writes to storage
    ///
    /// Call when the application goes to the background or shuts down.
    pub fn flush(&mut self) -> Result<()> {
        self.save()?;
        self.kv.flush()
    }

    // ========================================================================
    // List operations
    // ========================================================================

    /// Append to the end of the list
    pub fn add(&mut self, task: Task) {
        debug!(index = self.tasks.len(), "add: called");
        self.tasks.push(task);
        self.persist();
    }

    /// Apply `mutator` to the task at `index`
    ///
    /// Out-of-range indexes leave the list untouched and nothing is saved.
    pub fn update<F>(&mut self, index: usize, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Task),
    {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(StoreError::OutOfRange { index, len })?;
        mutator(task);
        debug!(index, "update: applied");
        self.persist();
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Task> {
        if index >= self.tasks.len() {
            return Err(StoreError::OutOfRange {
                index,
                len: self.tasks.len(),
            });
        }
        let task = self.tasks.remove(index);
        debug!(index, "remove_at: removed");
        self.persist();
        Ok(task)
    }

    /// Insert at `index`, shifting later tasks; `index == len` appends
    pub fn insert_at(&mut self, index: usize, task: Task) -> Result<()> {
        if index > self.tasks.len() {
            return Err(StoreError::OutOfRange {
                index,
                len: self.tasks.len(),
            });
        }
        self.tasks.insert(index, task);
        debug!(index, "insert_at: inserted");
        self.persist();
        Ok(())
    }

    // ========================================================================
    // Collaborator API
    // ========================================================================

    /// Replace the in-memory list with what is stored
    pub fn load_tasks(&mut self) -> &[Task] {
        self.tasks = self.load();
        &self.tasks
    }

    /// Replace the whole list and save it
    ///
    /// The new list is kept in memory even when the write fails.
    pub fn save_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.tasks = tasks;
        self.save()
    }

    /// Append a task with the default tag and return the updated list
    pub fn add_task(&mut self, text: impl Into<String>, due_date: i64, priority: i64) -> &[Task] {
        self.add(Task::new(text, due_date.max(0), priority));
        &self.tasks
    }

    pub fn edit_task(
        &mut self,
        index: usize,
        new_text: impl Into<String>,
        new_priority: i64,
        new_due_date: i64,
    ) -> Result<()> {
        let new_text = new_text.into();
        self.update(index, |task| {
            task.text = new_text;
            task.priority = new_priority;
            task.due_date = new_due_date.max(0);
        })
    }

    pub fn set_due_date(&mut self, index: usize, due_date: i64) -> Result<()> {
        self.update(index, |task| task.due_date = due_date.max(0))
    }

    pub fn set_tag(&mut self, index: usize, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        self.update(index, |task| task.tag = tag)
    }

    /// Remove a task and remember it for [`TaskStore::undo_delete`]
    ///
    /// A new delete replaces any earlier undo slot. If the slot cannot be
    /// written, the stale stored slot is removed so a later session cannot
    /// restore the wrong task.
    pub fn delete_task(&mut self, index: usize) -> Result<Task> {
        let task = self.remove_at(index)?;

        let slot = DeletedTask {
            index,
            task: task.clone(),
        };
        if let Err(e) = self.write_undo_slot(&slot) {
            error!(index, error = ?e, "Failed to record deleted task for undo");
            if let Err(e) = self.kv.remove(&self.keys.namespace, &self.keys.undo_key) {
                error!(error = ?e, "Failed to clear stale undo slot");
            }
        }
        self.last_deleted = Some(slot);

        Ok(task)
    }

    /// Put a previously removed task back at `index`
    pub fn restore_task(&mut self, index: usize, task: Task) -> Result<()> {
        self.insert_at(index, task)
    }

    /// The task the next [`TaskStore::undo_delete`] would restore
    pub fn last_deleted(&self) -> Option<&DeletedTask> {
        self.last_deleted.as_ref()
    }

    /// Restore the last deleted task at its prior index
    ///
    /// Returns the index it went back to, or `None` when there is nothing to
    /// undo. If the list has shrunk below that index the slot is kept and
    /// `OutOfRange` is returned.
    pub fn undo_delete(&mut self) -> Result<Option<usize>> {
        let Some(slot) = self.last_deleted.take() else {
            return Ok(None);
        };

        let index = slot.index;
        if index > self.tasks.len() {
            let len = self.tasks.len();
            self.last_deleted = Some(slot);
            return Err(StoreError::OutOfRange { index, len });
        }
        self.restore_task(index, slot.task)?;

        if let Err(e) = self.kv.remove(&self.keys.namespace, &self.keys.undo_key) {
            error!(error = ?e, "Failed to clear undo slot");
        }
        info!(index, "Restored deleted task");
        Ok(Some(index))
    }

    fn load_undo_slot(&self) -> Option<DeletedTask> {
        let raw = match self.kv.get_string(&self.keys.namespace, &self.keys.undo_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.keys.undo_key, error = ?e, "Failed to read undo slot");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!(key = %self.keys.undo_key, error = %e, "Ignoring unparseable undo slot");
                None
            }
        }
    }

    fn write_undo_slot(&mut self, slot: &DeletedTask) -> Result<()> {
        let encoded = serde_json::to_string(slot).map_err(StoreError::Encode)?;
        self.kv
            .put_string(&self.keys.namespace, &self.keys.undo_key, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BackgroundKv;
    use crate::kv::MemoryKv;
    use crate::sqlite::SqliteKv;
    use tempfile::TempDir;

    /// Memory store whose writes can be switched off
    #[derive(Default)]
    struct FlakyKv {
        inner: MemoryKv,
        fail_writes: bool,
        fail_reads: bool,
        fail_removes: bool,
        /// Refuse string writes to this one key only
        fail_key: Option<&'static str>,
    }

    impl KeyValueStore for FlakyKv {
        fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(StoreError::read(key, "read refused"));
            }
            self.inner.get_string(namespace, key)
        }

        fn put_string(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
            if self.fail_writes || self.fail_key == Some(key) {
                return Err(StoreError::write(key, "disk full"));
            }
            self.inner.put_string(namespace, key, value)
        }

        fn get_int(&self, namespace: &str, key: &str) -> Result<Option<i64>> {
            self.inner.get_int(namespace, key)
        }

        fn put_int(&mut self, namespace: &str, key: &str, value: i64) -> Result<()> {
            self.inner.put_int(namespace, key, value)
        }

        fn remove(&mut self, namespace: &str, key: &str) -> Result<()> {
            if self.fail_removes {
                return Err(StoreError::write(key, "remove refused"));
            }
            self.inner.remove(namespace, key)
        }
    }

    fn task(text: &str) -> Task {
        Task::new(text, 0, 0)
    }

    fn texts<K: KeyValueStore>(store: &TaskStore<K>) -> Vec<&str> {
        store.tasks().iter().map(|t| t.text.as_str()).collect()
    }

    fn open_memory() -> TaskStore<MemoryKv> {
        TaskStore::open(MemoryKv::new(), StoreKeys::default()).unwrap()
    }

    fn with_stored(raw: &str) -> TaskStore<MemoryKv> {
        let mut kv = MemoryKv::new();
        kv.put_string("TodoPrefs", "tasks", raw).unwrap();
        TaskStore::open(kv, StoreKeys::default()).unwrap()
    }

    #[test]
    fn test_empty_store_loads_empty_list() {
        let store = open_memory();
        assert!(store.is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_empty_string_loads_empty_list() {
        let store = with_stored("");
        assert!(store.is_empty());
    }

    #[test]
    fn test_buy_milk_scenario() {
        let mut store = open_memory();
        store.add(Task::with_tag("Buy milk", 0, 1, "General"));
        assert_eq!(store.tasks(), &[Task::with_tag("Buy milk", 0, 1, "General")]);

        store.save().unwrap();
        let fresh = TaskStore::open(store.into_inner(), StoreKeys::default()).unwrap();
        assert_eq!(fresh.tasks(), &[Task::with_tag("Buy milk", 0, 1, "General")]);
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let tasks = vec![
            Task::with_tag("none", 0, 0, "General"),
            Task::with_tag("low", 1_700_000_000_000, 1, "Work"),
            Task::with_tag("medium", 42, 2, "Personal"),
            Task::with_tag("high", 1, 3, "Shopping / ünïcødé \"quoted\""),
            Task::with_tag("high", 1, 3, ""),
        ];

        let mut store = open_memory();
        store.save_tasks(tasks.clone()).unwrap();

        let fresh = TaskStore::open(store.into_inner(), StoreKeys::default()).unwrap();
        assert_eq!(fresh.tasks(), tasks.as_slice());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let store = with_stored(r#"[{"text":"a"},{"text":"b","dueDate":99},{"text":"c","priority":3,"tag":"Work"}]"#);
        assert_eq!(
            store.tasks(),
            &[
                Task::with_tag("a", 0, 0, "General"),
                Task::with_tag("b", 99, 0, "General"),
                Task::with_tag("c", 0, 3, "Work"),
            ]
        );
    }

    #[test]
    fn test_malformed_storage_loads_empty() {
        let store = with_stored("this is not json");
        assert!(store.is_empty());

        let store = with_stored(r#"{"text":"object, not array"}"#);
        assert!(store.is_empty());
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let store = with_stored(r#"[{"text":"keep"},{"priority":2},{"text":"also keep"}]"#);
        assert_eq!(texts(&store), vec!["keep", "also keep"]);
    }

    #[test]
    fn test_unreadable_storage_loads_empty() {
        let kv = FlakyKv {
            fail_reads: true,
            ..FlakyKv::default()
        };
        let store = TaskStore::open(kv, StoreKeys::default()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_appends_and_saves() {
        let mut store = open_memory();
        store.add(task("A"));
        store.add(task("B"));
        store.add(task("A"));

        assert_eq!(texts(&store), vec!["A", "B", "A"]);
        let stored = store.kv().get_string("TodoPrefs", "tasks").unwrap().unwrap();
        assert!(stored.starts_with(r#"[{"text":"A""#));
        assert_eq!(store.load().len(), 3);
    }

    #[test]
    fn test_remove_then_insert_restores_order() {
        let mut store = open_memory();
        for name in ["A", "B", "C"] {
            store.add(task(name));
        }

        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.text, "B");
        assert_eq!(texts(&store), vec!["A", "C"]);

        store.insert_at(1, removed).unwrap();
        assert_eq!(texts(&store), vec!["A", "B", "C"]);
        assert_eq!(store.load(), store.tasks());
    }

    #[test]
    fn test_remove_last_then_insert_at_end() {
        let mut store = open_memory();
        store.add(task("A"));
        store.add(task("B"));

        let removed = store.remove_at(1).unwrap();
        store.insert_at(1, removed).unwrap();
        assert_eq!(texts(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_update_out_of_range_is_rejected() {
        let mut store = open_memory();
        store.add(task("A"));
        let before = store.kv().get_string("TodoPrefs", "tasks").unwrap();

        let err = store.update(1, |t| t.text = "changed".to_string()).unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange { index: 1, len: 1 }));
        assert_eq!(texts(&store), vec!["A"]);
        assert_eq!(store.kv().get_string("TodoPrefs", "tasks").unwrap(), before);

        assert!(store.update(usize::MAX, |t| t.priority = 3).is_err());
        assert_eq!(store.get(0).unwrap().priority, 0);
    }

    #[test]
    fn test_remove_and_insert_out_of_range() {
        let mut store = open_memory();
        store.add(task("A"));

        assert!(matches!(store.remove_at(1), Err(StoreError::OutOfRange { index: 1, len: 1 })));
        assert!(matches!(
            store.insert_at(2, task("X")),
            Err(StoreError::OutOfRange { index: 2, len: 1 })
        ));
        assert_eq!(texts(&store), vec!["A"]);

        store.insert_at(1, task("B")).unwrap();
        assert_eq!(texts(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_update_applies_and_saves() {
        let mut store = open_memory();
        store.add(task("A"));

        store
            .update(0, |t| {
                t.text = "A2".to_string();
                t.priority = 2;
            })
            .unwrap();

        assert_eq!(store.load(), vec![Task::new("A2", 0, 2)]);
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let mut store = TaskStore::open(FlakyKv::default(), StoreKeys::default()).unwrap();
        store.add(task("saved"));

        store.kv_mut().fail_writes = true;
        store.add(task("unsaved"));
        assert_eq!(texts(&store), vec!["saved", "unsaved"]);
        assert!(matches!(store.save(), Err(StoreError::StorageWrite { .. })));
        assert!(store.flush().is_err());

        // Storage still holds the last successful write
        assert_eq!(store.load(), vec![task("saved")]);

        store.kv_mut().fail_writes = false;
        store.flush().unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn test_collaborator_add_and_edit() {
        let mut store = open_memory();
        let list = store.add_task("Buy milk", 0, 1);
        assert_eq!(list, &[Task::new("Buy milk", 0, 1)]);

        store.edit_task(0, "Buy oat milk", 3, 1_700_000_000_000).unwrap();
        assert_eq!(store.get(0), Some(&Task::new("Buy oat milk", 1_700_000_000_000, 3)));

        store.set_due_date(0, 0).unwrap();
        store.set_tag(0, "Shopping").unwrap();
        assert_eq!(store.load(), vec![Task::with_tag("Buy oat milk", 0, 3, "Shopping")]);

        assert!(store.edit_task(5, "x", 0, 0).is_err());
    }

    #[test]
    fn test_load_tasks_replaces_memory() {
        let mut store = open_memory();
        store.add(task("A"));
        store
            .kv_mut()
            .put_string("TodoPrefs", "tasks", r#"[{"text":"external"}]"#)
            .unwrap();

        assert_eq!(store.load_tasks(), &[task("external")]);
    }

    #[test]
    fn test_delete_and_undo() {
        let mut store = open_memory();
        for name in ["A", "B", "C"] {
            store.add(task(name));
        }

        let removed = store.delete_task(1).unwrap();
        assert_eq!(removed.text, "B");
        assert_eq!(
            store.last_deleted(),
            Some(&DeletedTask {
                index: 1,
                task: task("B"),
            })
        );

        assert_eq!(store.undo_delete().unwrap(), Some(1));
        assert_eq!(texts(&store), vec!["A", "B", "C"]);
        assert_eq!(store.last_deleted(), None);
        assert_eq!(store.undo_delete().unwrap(), None);
    }

    #[test]
    fn test_only_last_delete_is_undoable() {
        let mut store = open_memory();
        for name in ["A", "B", "C"] {
            store.add(task(name));
        }

        store.delete_task(0).unwrap();
        store.delete_task(1).unwrap();
        assert_eq!(texts(&store), vec!["B"]);

        assert_eq!(store.undo_delete().unwrap(), Some(1));
        assert_eq!(texts(&store), vec!["B", "C"]);
        assert_eq!(store.undo_delete().unwrap(), None);
    }

    #[test]
    fn test_undo_past_end_keeps_slot() {
        let mut store = open_memory();
        for name in ["A", "B", "C"] {
            store.add(task(name));
        }
        store.delete_task(2).unwrap();
        store.remove_at(1).unwrap();

        assert!(matches!(store.undo_delete(), Err(StoreError::OutOfRange { index: 2, len: 1 })));
        assert!(store.last_deleted().is_some());
    }

    #[test]
    fn test_undo_slot_survives_reopen() {
        let temp = TempDir::new().unwrap();

        {
            let mut store = TaskStore::open(SqliteKv::open(temp.path()).unwrap(), StoreKeys::default()).unwrap();
            store.add_task("A", 0, 1);
            store.add_task("B", 0, 2);
            store.delete_task(0).unwrap();
        }

        let mut store = TaskStore::open(SqliteKv::open(temp.path()).unwrap(), StoreKeys::default()).unwrap();
        assert_eq!(texts(&store), vec!["B"]);
        assert_eq!(store.undo_delete().unwrap(), Some(0));
        assert_eq!(texts(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_failed_undo_write_drops_stale_slot() {
        let mut store = TaskStore::open(FlakyKv::default(), StoreKeys::default()).unwrap();
        for name in ["A", "B", "C"] {
            store.add(task(name));
        }
        store.delete_task(0).unwrap();
        assert!(store.kv().get_string("TodoPrefs", "lastDeleted").unwrap().is_some());

        store.kv_mut().fail_key = Some("lastDeleted");
        let removed = store.delete_task(1).unwrap();
        assert_eq!(removed.text, "C");
        assert_eq!(texts(&store), vec!["B"]);

        // Storage must not keep the slot for A
        assert_eq!(store.kv().get_string("TodoPrefs", "lastDeleted").unwrap(), None);
        assert_eq!(
            store.last_deleted(),
            Some(&DeletedTask {
                index: 1,
                task: task("C"),
            })
        );

        assert_eq!(store.undo_delete().unwrap(), Some(1));
        assert_eq!(texts(&store), vec!["B", "C"]);
    }

    #[test]
    fn test_undo_runs_once_when_slot_removal_fails() {
        let mut store = TaskStore::open(FlakyKv::default(), StoreKeys::default()).unwrap();
        store.add(task("A"));
        store.add(task("B"));
        store.delete_task(0).unwrap();

        store.kv_mut().fail_removes = true;
        assert_eq!(store.undo_delete().unwrap(), Some(0));
        assert_eq!(store.undo_delete().unwrap(), None);
        assert_eq!(texts(&store), vec!["A", "B"]);
        assert_eq!(store.last_deleted(), None);

        store.kv_mut().fail_removes = false;
        assert_eq!(store.undo_delete().unwrap(), None);
        assert_eq!(store.load(), vec![task("A"), task("B")]);
    }

    #[test]
    fn test_background_sqlite_end_to_end() {
        let temp = TempDir::new().unwrap();

        {
            let kv = BackgroundKv::spawn(SqliteKv::open(temp.path()).unwrap());
            let mut store = TaskStore::open(kv, StoreKeys::default()).unwrap();
            store.add_task("A", 0, 1);
            store.add_task("B", 1_700_000_000_000, 2);
            store.add_task("C", 0, 3);
            store.edit_task(0, "A2", 3, 5).unwrap();
            store.set_tag(1, "Work").unwrap();
            store.delete_task(2).unwrap();
            store.flush().unwrap();
        }

        let mut store = TaskStore::open(SqliteKv::open(temp.path()).unwrap(), StoreKeys::default()).unwrap();
        assert_eq!(
            store.tasks(),
            &[
                Task::new("A2", 5, 3),
                Task::with_tag("B", 1_700_000_000_000, 2, "Work"),
            ]
        );
        assert_eq!(
            store.last_deleted(),
            Some(&DeletedTask {
                index: 2,
                task: Task::new("C", 0, 3),
            })
        );
        assert_eq!(store.undo_delete().unwrap(), Some(2));
        assert_eq!(texts(&store), vec!["A2", "B", "C"]);
    }

    #[test]
    fn test_background_flush_surfaces_write_failure() {
        let kv = FlakyKv {
            fail_writes: true,
            ..FlakyKv::default()
        };
        let mut store = TaskStore::open(BackgroundKv::spawn(kv), StoreKeys::default()).unwrap();
        store.add(task("A"));

        assert!(matches!(store.flush(), Err(StoreError::StorageWrite { .. })));
        assert_eq!(texts(&store), vec!["A"]);
    }

    #[test]
    fn test_colliding_keys_refused() {
        let keys = StoreKeys {
            undo_key: "tasks".to_string(),
            ..StoreKeys::default()
        };
        assert!(matches!(
            TaskStore::open(MemoryKv::new(), keys),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_custom_namespace_is_isolated() {
        let mut kv = MemoryKv::new();
        kv.put_string("TodoPrefs", "tasks", r#"[{"text":"default ns"}]"#).unwrap();

        let keys = StoreKeys {
            namespace: "Other".to_string(),
            ..StoreKeys::default()
        };
        let mut store = TaskStore::open(kv, keys).unwrap();
        assert!(store.is_empty());

        store.add(task("other ns"));
        let kv = store.into_inner();
        assert_eq!(
            kv.get_string("TodoPrefs", "tasks").unwrap().as_deref(),
            Some(r#"[{"text":"default ns"}]"#)
        );
    }
}
