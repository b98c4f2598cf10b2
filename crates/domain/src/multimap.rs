use indexmap::{Equivalent, IndexMap};
use std::hash::Hash;

/// A multi map that remembers the order in which keys were first inserted
/// and the order in which values were appended under each key.
#[derive(Debug, Clone)]
pub struct OrderedMultiMap<K: Eq + Hash, V> {
    entries: IndexMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> OrderedMultiMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Appends `value` to the values of `key`, creating the entry if absent
    pub fn append(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().flatten()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of values across all keys
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for OrderedMultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps are equal when they hold the same keys and values in the same order
impl<K: Eq + Hash, V: PartialEq> PartialEq for OrderedMultiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}
