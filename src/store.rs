// 🗃️ Record Store - generic in-memory collection behind one lock
//
// Same shape as the entity registries: a shared Vec guarded by a lock,
// reads hand back cloned snapshots so callers can never mutate the store.
// Every operation takes the lock for its whole duration; nothing is held
// across calls.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::id_allocator::RecordId;

pub struct RecordStore<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> RecordStore<T> {
    pub fn new() -> Self {
        RecordStore {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    // A panic mid-push cannot leave the Vec half-written, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a record (visible to every later read).
    pub fn add(&self, record: T) {
        self.lock().push(record);
    }

    /// Append `record` unless an existing record satisfies `conflicts`.
    /// The check and the append happen under the same lock.
    pub fn add_unless<F>(&self, record: T, conflicts: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut items = self.lock();
        if items.iter().any(|item| conflicts(item)) {
            return false;
        }
        items.push(record);
        true
    }

    /// Remove the first record equal to `record`. Returns whether one was removed.
    pub fn remove(&self, record: &T) -> bool
    where
        T: PartialEq,
    {
        let mut items = self.lock();
        match items.iter().position(|item| item == record) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Independent snapshot in insertion order.
    pub fn get_all(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// First record whose extracted id equals `id`.
    ///
    /// An extractor returning `None` for a record counts as "no match" and the
    /// scan carries on.
    pub fn find_by_id<F>(&self, extractor: F, id: RecordId) -> Option<T>
    where
        F: Fn(&T) -> Option<RecordId>,
    {
        self.lock()
            .iter()
            .find(|item| extractor(*item) == Some(id))
            .cloned()
    }

    /// All records matching `predicate`, in insertion order.
    pub fn find_by_predicate<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.lock()
            .iter()
            .filter(|item| predicate(*item))
            .cloned()
            .collect()
    }

    /// Apply `update` to the first record with id `id`, in place.
    ///
    /// Returns `None` when nothing matched, otherwise the closure's result.
    pub fn update_by_id<F, U, R>(&self, extractor: F, id: RecordId, update: U) -> Option<R>
    where
        F: Fn(&T) -> Option<RecordId>,
        U: FnOnce(&mut T) -> R,
    {
        let mut items = self.lock();
        items
            .iter_mut()
            .find(|item| extractor(&**item) == Some(id))
            .map(update)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T: Clone> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordStore<T> {
    /// Clones share the same underlying records.
    fn clone(&self) -> Self {
        RecordStore {
            items: Arc::clone(&self.items),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: Option<RecordId>,
        label: &'static str,
    }

    fn item(id: RecordId, label: &'static str) -> Item {
        Item { id: Some(id), label }
    }

    #[test]
    fn test_add_and_get_all_preserves_order() {
        let store = RecordStore::new();
        store.add(item(2, "b"));
        store.add(item(1, "a"));

        let all = store.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].label, "b");
        assert_eq!(all[1].label, "a");
    }

    #[test]
    fn test_snapshot_is_independent() {
        let store = RecordStore::new();
        store.add(item(1, "a"));

        let mut snapshot = store.get_all();
        snapshot.clear();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_first_equal_match() {
        let store = RecordStore::new();
        store.add(item(1, "a"));
        store.add(item(1, "a"));
        store.add(item(2, "b"));

        assert!(store.remove(&item(1, "a")));
        assert_eq!(store.len(), 2);
        assert!(!store.remove(&item(9, "z")));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_find_by_id_skips_failed_extraction() {
        let store = RecordStore::new();
        store.add(Item { id: None, label: "broken" });
        store.add(item(7, "seven"));

        let found = store.find_by_id(|i| i.id, 7);
        assert_eq!(found.map(|i| i.label), Some("seven"));
        assert!(store.find_by_id(|i| i.id, 8).is_none());
    }

    #[test]
    fn test_find_by_id_returns_first_match() {
        let store = RecordStore::new();
        store.add(item(3, "first"));
        store.add(item(3, "second"));

        assert_eq!(store.find_by_id(|i| i.id, 3).unwrap().label, "first");
    }

    #[test]
    fn test_find_by_predicate() {
        let store = RecordStore::new();
        store.add(item(1, "apple"));
        store.add(item(2, "banana"));
        store.add(item(3, "avocado"));

        let found = store.find_by_predicate(|i| i.label.starts_with('a'));
        assert_eq!(found.len(), 2);
        assert!(store.find_by_predicate(|_| false).is_empty());
    }

    #[test]
    fn test_add_unless_rejects_conflict() {
        let store = RecordStore::new();
        assert!(store.add_unless(item(1, "a"), |i| i.id == Some(1)));
        assert!(!store.add_unless(item(1, "dup"), |i| i.id == Some(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_by_id() {
        let store = RecordStore::new();
        store.add(item(1, "a"));

        let updated = store.update_by_id(|i| i.id, 1, |i| {
            i.label = "changed";
            i.label
        });
        assert_eq!(updated, Some("changed"));
        assert_eq!(store.get_all()[0].label, "changed");
        assert!(store.update_by_id(|i| i.id, 2, |_| ()).is_none());
    }

    #[test]
    fn test_concurrent_adds_are_all_visible() {
        let store: RecordStore<Item> = RecordStore::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for n in 0..100 {
                        store.add(item(t * 100 + n, "x"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 800);
        assert!(!store.is_empty());
    }
}
