// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered keyed collection with id-stable diffing.
//!
//! List-backed state (upload rows, download rows) is reconciled against the
//! previous snapshot by key: entries are created only for added keys and
//! dropped only for removed keys, while retained keys are updated in place.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Keys that differ between two ordered snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedDiff<K> {
    /// Keys only in the new snapshot, in new-snapshot order.
    pub added: Vec<K>,
    /// Keys only in the old snapshot, in old-snapshot order.
    pub removed: Vec<K>,
    /// Keys in both snapshots, in new-snapshot order.
    pub retained: Vec<K>,
}

impl<K> KeyedDiff<K> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare two ordered key lists.
///
/// Duplicate keys within one list are treated as a single occurrence.
pub fn keyed_diff<K>(old: &[K], new: &[K]) -> KeyedDiff<K>
where
    K: Eq + Hash + Clone,
{
    let old_set: HashSet<&K> = old.iter().collect();
    let new_set: HashSet<&K> = new.iter().collect();

    let mut seen = HashSet::new();
    let mut added = Vec::new();
    let mut retained = Vec::new();
    for key in new {
        if !seen.insert(key) {
            continue;
        }
        if old_set.contains(key) {
            retained.push(key.clone());
        } else {
            added.push(key.clone());
        }
    }

    let mut seen = HashSet::new();
    let removed = old
        .iter()
        .filter(|key| seen.insert(*key) && !new_set.contains(key))
        .cloned()
        .collect();

    KeyedDiff {
        added,
        removed,
        retained,
    }
}

/// Values addressed by key, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct IdCollection<K, V> {
    order: Vec<K>,
    items: HashMap<K, V>,
}

impl<K, V> Default for IdCollection<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            items: HashMap::new(),
        }
    }
}

impl<K, V> IdCollection<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.items.get_mut(key)
    }

    /// Insert or replace. A new key goes to the end; a replaced key keeps its position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.items.insert(key.clone(), value);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.items.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.items.clear();
    }

    /// Keys in iteration order.
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order
            .iter()
            .filter_map(|key| self.items.get(key).map(|value| (key, value)))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Diff this collection's keys against `new_keys`.
    pub fn diff(&self, new_keys: &[K]) -> KeyedDiff<K> {
        keyed_diff(&self.order, new_keys)
    }

    /// Bring the collection in line with `snapshot`.
    ///
    /// `create` runs once per added key, `update` once per retained key, and
    /// removed entries are dropped. Afterwards iteration order matches the
    /// snapshot. Returns the diff that was applied.
    pub fn reconcile<S>(
        &mut self,
        snapshot: &[S],
        key_of: impl Fn(&S) -> K,
        mut create: impl FnMut(&S) -> V,
        mut update: impl FnMut(&mut V, &S),
    ) -> KeyedDiff<K> {
        let new_keys: Vec<K> = snapshot.iter().map(&key_of).collect();
        let diff = self.diff(&new_keys);

        for key in &diff.removed {
            self.items.remove(key);
        }

        let mut order = Vec::with_capacity(new_keys.len());
        for item in snapshot {
            let key = key_of(item);
            if order.contains(&key) {
                continue;
            }
            match self.items.get_mut(&key) {
                Some(value) => update(value, item),
                None => {
                    self.items.insert(key.clone(), create(item));
                }
            }
            order.push(key);
        }
        self.order = order;

        diff
    }
}
