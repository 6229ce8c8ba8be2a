use std::collections::HashMap;
use std::sync::RwLock;

/// Process-lifetime memoization store shared across requests.
///
/// Exact-key lookup, no eviction, explicitly clearable. Concurrent requests
/// for the same key may both miss and both compute; entries are idempotent so
/// the overwriting store is harmless.
#[derive(Debug)]
pub struct MemoStore<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Default for MemoStore<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> MemoStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .expect("memo store lock poisoned")
            .get(key)
            .cloned()
    }

    pub fn store(&self, key: impl Into<String>, value: V) {
        self.entries
            .write()
            .expect("memo store lock poisoned")
            .insert(key.into(), value);
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .expect("memo store lock poisoned")
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("memo store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
