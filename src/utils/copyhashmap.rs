use {
    ahash::AHashMap,
    std::{
        cell::{RefCell, RefMut},
        hash::Hash,
    },
};

/// A hash map whose accessors clone values out so that no borrow outlives a
/// call.
pub struct CopyHashMap<K, V> {
    map: RefCell<AHashMap<K, V>>,
}

impl<K, V> Default for CopyHashMap<K, V> {
    fn default() -> Self {
        Self {
            map: Default::default(),
        }
    }
}

impl<K: Eq + Hash + Copy, V: Clone> CopyHashMap<K, V> {
    pub fn set(&self, k: K, v: V) -> Option<V> {
        self.map.borrow_mut().insert(k, v)
    }

    pub fn get(&self, k: &K) -> Option<V> {
        self.map.borrow().get(k).cloned()
    }

    pub fn remove(&self, k: &K) -> Option<V> {
        self.map.borrow_mut().remove(k)
    }

    pub fn contains(&self, k: &K) -> bool {
        self.map.borrow().contains_key(k)
    }

    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }

    pub fn lock(&self) -> RefMut<'_, AHashMap<K, V>> {
        self.map.borrow_mut()
    }

    pub fn values(&self) -> Vec<V> {
        self.map.borrow().values().cloned().collect()
    }

    /// Removes and returns every entry.
    pub fn take(&self) -> Vec<(K, V)> {
        self.map.borrow_mut().drain().collect()
    }
}
