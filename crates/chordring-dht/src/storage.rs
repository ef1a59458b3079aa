//! Per-node key-value storage

use crate::{Key, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key-value pairs held by a single node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStore {
    /// Stored values by key
    entries: HashMap<Key, Value>,
}

impl NodeStore {
    /// Create empty storage
    pub fn new() -> Self {
        NodeStore {
            entries: HashMap::new(),
        }
    }

    /// Get number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a value, returning the one it replaced
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Retrieve a value
    pub fn get(&self, key: Key) -> Option<&Value> {
        self.entries.get(&key)
    }

    /// Check if a key is stored
    pub fn contains(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    /// Remove a value
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        self.entries.remove(&key)
    }

    /// Stored keys in ascending order
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Stored pairs in ascending key order
    pub fn sorted_entries(&self) -> Vec<(Key, &Value)> {
        let mut entries: Vec<(Key, &Value)> = self.entries.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }

    /// Remove and return every pair whose key matches `predicate`
    pub fn take_matching<F>(&mut self, mut predicate: F) -> Vec<(Key, Value)>
    where
        F: FnMut(Key) -> bool,
    {
        let keys: Vec<Key> = self
            .entries
            .keys()
            .copied()
            .filter(|k| predicate(*k))
            .collect();

        let mut taken: Vec<(Key, Value)> = keys
            .into_iter()
            .filter_map(|k| self.entries.remove(&k).map(|v| (k, v)))
            .collect();
        taken.sort_unstable_by_key(|(k, _)| *k);
        taken
    }

    /// Move every pair out of `other` into this store
    ///
    /// Pairs from `other` overwrite existing values on key collision.
    /// Returns the number of overwritten keys.
    pub fn absorb(&mut self, other: NodeStore) -> usize {
        let mut overwritten = 0;
        for (key, value) in other.entries {
            if self.entries.insert(key, value).is_some() {
                overwritten += 1;
            }
        }
        overwritten
    }
}

impl FromIterator<(Key, Value)> for NodeStore {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        NodeStore {
            entries: iter.into_iter().collect(),
        }
    }
}
