//! # Association Cache
//!
//! Per-instance memo of lazily loaded associations.
//!
//! An entry is either absent (never loaded, or invalidated) or holds the
//! complete list returned by its loader. A loader that fails leaves the entry
//! absent, so a partial list is never observable.
//!
//! The cache is owned exclusively by its entity and is not synchronized;
//! only the owning entity's `sync()` invalidates it.

use crate::GitlodError;
use std::collections::BTreeMap;

/// Memoized association lists of one entity, keyed by association name.
#[derive(Debug, Clone)]
pub struct AssociationCache<E> {
    entries: BTreeMap<&'static str, Vec<E>>,
}

impl<E> Default for AssociationCache<E> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<E> AssociationCache<E> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized list for `name`, running `loader` on first access.
    pub fn get_or_load<F>(&mut self, name: &'static str, loader: F) -> Result<&[E], GitlodError>
    where
        F: FnOnce() -> Result<Vec<E>, GitlodError>,
    {
        let entities = match self.entries.entry(name) {
            std::collections::btree_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::btree_map::Entry::Vacant(entry) => {
                let loaded = loader()?;
                tracing::debug!(association = name, count = loaded.len(), "association loaded");
                entry.insert(loaded)
            }
        };
        Ok(entities)
    }

    /// The memoized list for `name`, without loading.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[E]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Whether `name` is currently memoized.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Forget the memoized list for `name`.
    pub fn invalidate(&mut self, name: &str) {
        self.entries.remove(name);
    }

    /// Forget every memoized list.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn loader_runs_once() {
        let mut cache: AssociationCache<u32> = AssociationCache::new();
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok(vec![1, 2, 3])
        };

        assert_eq!(cache.get_or_load("nums", load).expect("load"), &[1, 2, 3]);
        assert_eq!(cache.get_or_load("nums", load).expect("load"), &[1, 2, 3]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let mut cache: AssociationCache<u32> = AssociationCache::new();
        cache.get_or_load("a", || Ok(vec![1])).expect("load");
        cache.get_or_load("b", || Ok(vec![2])).expect("load");

        cache.invalidate("a");
        assert!(!cache.is_loaded("a"));
        assert!(cache.is_loaded("b"));

        let reloaded = cache.get_or_load("a", || Ok(vec![9])).expect("load");
        assert_eq!(reloaded, &[9]);

        cache.invalidate_all();
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn failed_load_leaves_entry_absent() {
        let mut cache: AssociationCache<u32> = AssociationCache::new();
        let result = cache.get_or_load("a", || {
            Err(GitlodError::RemoteFetchError("down".to_string()))
        });
        assert!(result.is_err());
        assert!(!cache.is_loaded("a"));
    }

    #[test]
    fn empty_list_is_a_complete_entry() {
        let mut cache: AssociationCache<u32> = AssociationCache::new();
        cache.get_or_load("a", || Ok(Vec::new())).expect("load");
        assert!(cache.is_loaded("a"));
        assert_eq!(cache.get("a"), Some(&[][..]));
    }
}
