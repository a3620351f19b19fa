use crate::{Entry, Store, StoredValue};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};

/// In-memory store. `Clone` shares the underlying table, so a cloned handle
/// observes writes made through the original.
#[derive(Clone, Default)]
pub struct MemStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl std::fmt::Debug for MemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemStore")
            .field("entries", &self.entries.read().unwrap().len())
            .finish()
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemStore {
    fn entry(&self, key: &str) -> Option<StoredValue> {
        self.entries.read().unwrap().get(key).map(|e| e.value.clone())
    }

    fn init(&self, key: &str, value: StoredValue) {
        let mut guard = self.entries.write().unwrap();
        guard.entry(key.to_owned()).or_insert(Entry {
            value,
            persistent: true,
        });
    }

    fn set(&self, key: &str, value: StoredValue) {
        let mut guard = self.entries.write().unwrap();
        match guard.get_mut(key) {
            Some(entry) => entry.value = value,
            None => {
                guard.insert(
                    key.to_owned(),
                    Entry {
                        value,
                        persistent: true,
                    },
                );
            }
        }
    }

    fn remove(&self, key: &str) {
        self.entries.write().unwrap().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().unwrap().keys().cloned().collect()
    }

    fn mark_transient(&self, key: &str) {
        if let Some(entry) = self.entries.write().unwrap().get_mut(key) {
            entry.persistent = false;
        }
    }

    fn persistent_snapshot(&self) -> BTreeMap<String, StoredValue> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|(_, e)| e.persistent)
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_does_not_clobber_existing_value() {
        let store = MemStore::new();
        store.set_long("Drive/weight", 2813);
        store.init_long("Drive/weight", 0);
        assert_eq!(store.get_long("Drive/weight", -1), 2813);
    }

    #[test]
    fn typed_get_falls_back_on_variant_mismatch() {
        let store = MemStore::new();
        store.set_text("Drive/name", "Drive");
        assert_eq!(store.get_bool("Drive/name", true), true);
        assert_eq!(store.get_text("Drive/name", ""), "Drive");
    }

    #[test]
    fn clone_shares_state() {
        let store = MemStore::new();
        let alias = store.clone();
        store.set_bool("Drive/enabled", true);
        assert!(alias.get_bool("Drive/enabled", false));
    }

    #[test]
    fn transient_entries_excluded_from_snapshot() {
        let store = MemStore::new();
        store.set_text(".schemas/Drive", "DriveConfig");
        store.mark_transient(".schemas/Drive");
        store.set_long("Drive/weight", 2813);
        let snapshot = store.persistent_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("Drive/weight"), Some(&StoredValue::Long(2813)));
        // Transient entries still read back normally.
        assert_eq!(store.get_text(".schemas/Drive", ""), "DriveConfig");
    }

    #[test]
    fn remove_and_keys() {
        let store = MemStore::new();
        store.set_bool("a", true);
        store.set_bool("b", false);
        store.remove("a");
        assert_eq!(store.keys(), vec!["b".to_owned()]);
        assert!(!store.contains("a"));
    }
}
