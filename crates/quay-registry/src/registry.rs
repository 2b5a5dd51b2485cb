//! Unique-key registries.
//!
//! Inserting a key that already exists is always a reported failure
//! (`AlreadyExists`), never an overwrite. Bulk loading is all-or-nothing.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use quay_types::error::{QuayError, Result};
use quay_types::status::{Failure, Outcome, ResultStatus};

use crate::source::ContentSource;

/// Read-only view over a registry.
pub trait RegistryRead<K, V> {
    /// Look up a value by key. Misses fail with `ValueDoesNotExist`.
    fn try_get<Q>(&self, key: &Q) -> Outcome<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Number of entries.
    fn count(&self) -> usize;

    /// All keys, in unspecified order.
    fn keys(&self) -> Vec<&K>;

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key).is_ok()
    }
}

/// Mutable unique-key store.
pub struct Registry<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Hash + Eq, V> Registry<K, V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert a single entry. Fails with `AlreadyExists` if the key is taken;
    /// the existing value is left untouched.
    pub fn try_register(&mut self, key: K, value: V) -> Outcome<()> {
        if self.entries.contains_key(&key) {
            return Err(Failure::new(ResultStatus::AlreadyExists));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Insert a batch of entries. Either every entry is inserted, or none is
    /// and the first collision (with the registry or within the batch) is
    /// reported.
    pub fn extend_unique<I>(&mut self, entries: I) -> Outcome<usize>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut staged: HashMap<K, V> = HashMap::new();
        for (key, value) in entries {
            if self.entries.contains_key(&key) || staged.contains_key(&key) {
                return Err(Failure::new(ResultStatus::AlreadyExists));
            }
            staged.insert(key, value);
        }
        let n = staged.len();
        self.entries.extend(staged);
        Ok(n)
    }

    /// Bulk-load every value of `category` from `source`, keyed by `key_of`.
    ///
    /// The load is all-or-nothing: a load error or duplicate key aborts it and
    /// leaves the registry unchanged.
    pub fn init<S, F>(&mut self, source: &S, category: &str, key_of: F) -> Result<usize>
    where
        S: ContentSource<V> + ?Sized,
        F: Fn(&V) -> K,
        K: fmt::Debug,
    {
        let ids = source.find(category)?;
        let mut loaded = Vec::with_capacity(ids.len());
        for id in &ids {
            let value = source.load(id)?;
            let key = key_of(&value);
            if self.entries.contains_key(&key) || loaded.iter().any(|(k, _)| *k == key) {
                log::warn!("Bulk load of '{category}' aborted: duplicate key {key:?} in {id}");
                return Err(QuayError::Registration(format!(
                    "duplicate key {key:?} in {id}"
                )));
            }
            loaded.push((key, value));
        }
        let n = loaded.len();
        self.entries.extend(loaded);
        log::info!("Loaded {n} '{category}' entries");
        Ok(n)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over all entries, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Turn this registry into a read-only shared facade.
    pub fn freeze(self) -> SharedRegistry<K, V> {
        SharedRegistry {
            inner: Rc::new(self),
        }
    }
}

impl<K: Hash + Eq, V> RegistryRead<K, V> for Registry<K, V> {
    fn try_get<Q>(&self, key: &Q) -> Outcome<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .ok_or(Failure::new(ResultStatus::ValueDoesNotExist))
    }

    fn count(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Vec<&K> {
        self.entries.keys().collect()
    }
}

impl<K: Hash + Eq, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Registry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Read-only facade over a frozen registry. Clones share the same entries.
pub struct SharedRegistry<K, V> {
    inner: Rc<Registry<K, V>>,
}

impl<K: Hash + Eq, V> SharedRegistry<K, V> {
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.iter()
    }
}

impl<K, V> Clone for SharedRegistry<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: Hash + Eq, V> RegistryRead<K, V> for SharedRegistry<K, V> {
    fn try_get<Q>(&self, key: &Q) -> Outcome<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.try_get(key)
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn keys(&self) -> Vec<&K> {
        self.inner.keys()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for SharedRegistry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}
