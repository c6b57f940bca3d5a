use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use crate::core::{Customer, Product};

/// Unbounded read-through cache handing out one shared instance per key.
///
/// The loader runs under the write lock after a second lookup, so two
/// threads missing on the same key never insert different instances.
/// Absence is not cached: a later call for the same key asks the loader again.
#[derive(Debug)]
pub struct IdentityCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for IdentityCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Copy, V> IdentityCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached instance for `key`, if any. Never calls a loader.
    pub fn get(&self, key: K) -> Option<Arc<V>> {
        // A panic inside a loader never leaves a half-written entry, so the
        // map is still consistent after poisoning.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&key).cloned()
    }

    /// Return the cached instance for `key`, loading and storing it on a miss.
    pub fn get_or_load<E>(
        &self,
        key: K,
        load: impl FnOnce(K) -> Result<Option<V>, E>,
    ) -> Result<Option<Arc<V>>, E> {
        if let Some(hit) = self.get(key) {
            return Ok(Some(hit));
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = entries.get(&key) {
            return Ok(Some(Arc::clone(hit)));
        }
        match load(key)? {
            Some(value) => {
                let value = Arc::new(value);
                entries.insert(key, Arc::clone(&value));
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The reference data shared across invoices: customers and products by id.
#[derive(Debug, Default)]
pub struct EntityStore {
    pub customers: IdentityCache<u32, Customer>,
    pub products: IdentityCache<u32, Product>,
}
