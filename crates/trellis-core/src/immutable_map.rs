//! Copy-on-write string-keyed map.
//!
//! Used for per-pass memo tables, node slot tables and parent-data stores.
//! Clones share the backing table; the first write through a shared handle
//! copies it, so every `assoc` leaves the receiver untouched.

use std::fmt;
use std::rc::Rc;

use crate::collections::map::HashMap;

pub struct ImmutableMap<V> {
    table: Rc<HashMap<String, V>>,
}

impl<V> ImmutableMap<V> {
    pub fn new() -> Self {
        Self {
            table: Rc::new(HashMap::default()),
        }
    }

    pub fn find(&self, key: &str) -> Option<&V> {
        self.table.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.table.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// True when both handles share one backing table.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.table, &other.table)
    }
}

impl<V: Clone> ImmutableMap<V> {
    /// Returns a map with `value` bound to `key`.
    #[must_use]
    pub fn assoc(&self, key: impl Into<String>, value: V) -> Self {
        let mut next = self.clone();
        Rc::make_mut(&mut next.table).insert(key.into(), value);
        next
    }

    /// Returns a map without `key`. Shares the table when `key` is absent.
    #[must_use]
    pub fn dissoc(&self, key: &str) -> Self {
        if !self.contains(key) {
            return self.clone();
        }
        let mut next = self.clone();
        Rc::make_mut(&mut next.table).remove(key);
        next
    }

    /// In-place variant of [`assoc`](Self::assoc) for builders that own the handle.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        Rc::make_mut(&mut self.table).insert(key.into(), value);
    }
}

impl<V> Clone for ImmutableMap<V> {
    fn clone(&self) -> Self {
        Self {
            table: Rc::clone(&self.table),
        }
    }
}

impl<V> Default for ImmutableMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> FromIterator<(String, V)> for ImmutableMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> fmt::Debug for ImmutableMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("ImmutableMap").field("keys", &keys).finish()
    }
}

#[cfg(test)]
#[path = "tests/immutable_map_tests.rs"]
mod tests;
