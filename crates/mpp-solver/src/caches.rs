//! Memoisation storage with a selectable concurrency policy.
//!
//! Checker code only sees [`CacheStorage`]. The host picks the
//! implementation when it builds the checker:
//!
//! - [`ThreadUnsafeCache`]: `RefCell<FxHashMap>`, for single-threaded runs.
//! - [`ThreadSafeCache`]: `DashMap`, per-shard locking, shareable between
//!   worker threads through an `Arc`.
//!
//! Computation happens outside any lock: two threads racing on the same key
//! may both compute, and the first stored value wins. Cached computations are
//! pure, so both results are identical.

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::cell::RefCell;
use std::hash::Hash;
use std::sync::Arc;

/// Which storage a host wants for its caches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    #[default]
    ThreadUnsafe,
    ThreadSafe,
}

pub trait CacheStorage<K, V> {
    fn get(&self, key: &K) -> Option<V>;

    /// Store `value` unless another value was stored first; returns the
    /// value now held for `key`.
    fn insert(&self, key: K, value: V) -> V;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);

    /// Cached value for `key`, computing and storing it on a miss.
    fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> V
    where
        Self: Sized,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value)
    }
}

// -----------------------------------------------------------------------------
// Thread-unsafe
// -----------------------------------------------------------------------------

pub struct ThreadUnsafeCache<K, V> {
    map: RefCell<FxHashMap<K, V>>,
}

impl<K, V> ThreadUnsafeCache<K, V> {
    pub fn new() -> Self {
        Self {
            map: RefCell::new(FxHashMap::default()),
        }
    }
}

impl<K, V> Default for ThreadUnsafeCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V: Clone> CacheStorage<K, V> for ThreadUnsafeCache<K, V> {
    fn get(&self, key: &K) -> Option<V> {
        self.map.borrow().get(key).cloned()
    }

    fn insert(&self, key: K, value: V) -> V {
        self.map.borrow_mut().entry(key).or_insert(value).clone()
    }

    fn len(&self) -> usize {
        self.map.borrow().len()
    }

    fn clear(&self) {
        self.map.borrow_mut().clear();
    }
}

// -----------------------------------------------------------------------------
// Thread-safe
// -----------------------------------------------------------------------------

pub struct ThreadSafeCache<K: Hash + Eq, V> {
    map: DashMap<K, V, FxBuildHasher>,
}

impl<K: Hash + Eq, V> ThreadSafeCache<K, V> {
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(FxBuildHasher),
        }
    }
}

impl<K: Hash + Eq, V> Default for ThreadSafeCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V: Clone> CacheStorage<K, V> for ThreadSafeCache<K, V> {
    fn get(&self, key: &K) -> Option<V> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    fn insert(&self, key: K, value: V) -> V {
        self.map.entry(key).or_insert(value).value().clone()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&self) {
        self.map.clear();
    }
}

/// A cache shared through an `Arc` (e.g. one `ThreadSafeCache` behind
/// several per-thread checkers).
impl<K, V, C: CacheStorage<K, V>> CacheStorage<K, V> for Arc<C> {
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn insert(&self, key: K, value: V) -> V {
        (**self).insert(key, value)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn clear(&self) {
        (**self).clear();
    }
}

#[cfg(test)]
#[path = "tests/caches_tests.rs"]
mod tests;
