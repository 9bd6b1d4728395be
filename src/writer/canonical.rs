//! Per-document canonical tables.
//!
//! A canonical table maps a drawing resource's equality key to the single
//! canonical object that represents it in one document. The first request
//! for a key materializes the object; every later request for an equal key
//! returns the stored handle.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Result;

/// Lookup-or-insert map from equality key to canonical handle.
#[derive(Debug, Clone)]
pub struct CanonicalTable<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for CanonicalTable<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Clone> CanonicalTable<K, V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key without materializing.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Return the stored handle for `key`, or run `materialize` and store its result.
    ///
    /// If `materialize` fails, nothing is stored and the error is returned.
    pub fn get_or_try_insert_with<F>(&mut self, key: K, materialize: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(existing) = self.entries.get(&key) {
            return Ok(existing.clone());
        }
        let value = materialize()?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    /// Number of canonical objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored handles (unordered).
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_materializes_once() {
        let mut table: CanonicalTable<&str, u32> = CanonicalTable::new();
        let mut calls = 0;
        let a = table
            .get_or_try_insert_with("k", || {
                calls += 1;
                Ok(7)
            })
            .unwrap();
        let b = table
            .get_or_try_insert_with("k", || {
                calls += 1;
                Ok(8)
            })
            .unwrap();
        assert_eq!((a, b), (7, 7));
        assert_eq!(calls, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_failure_stores_nothing() {
        let mut table: CanonicalTable<&str, u32> = CanonicalTable::new();
        let result = table.get_or_try_insert_with("k", || Err(Error::Font("bad".into())));
        assert!(result.is_err());
        assert!(table.is_empty());
        assert_eq!(table.get_or_try_insert_with("k", || Ok(1)).unwrap(), 1);
    }
}
