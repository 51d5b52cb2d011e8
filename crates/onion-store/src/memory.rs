//! In-memory implementation of the KvStore trait.
//!
//! This is primarily for testing. It has the same ordering semantics as
//! SQLite but keeps everything in memory with no persistence.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::traits::KvStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let mut store = MemoryStore::new();
        assert!(store.get(b"a").unwrap().is_none());

        store.set(b"a", b"1").unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));

        store.set(b"a", b"2").unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"2".to_vec()));

        store.delete(b"a").unwrap();
        assert!(store.get(b"a").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_prefix_scan_sorted_and_bounded() {
        let mut store = MemoryStore::new();
        store.set(b"seq/c", b"3").unwrap();
        store.set(b"seq/a", b"1").unwrap();
        store.set(b"seq/b", b"2").unwrap();
        store.set(b"sez", b"x").unwrap();
        store.set(b"acc/a", b"y").unwrap();

        let keys: Vec<Vec<u8>> = store
            .prefix_scan(b"seq/")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"seq/a".to_vec(), b"seq/b".to_vec(), b"seq/c".to_vec()]);
    }

    #[test]
    fn test_apply_batch_default() {
        let mut store = MemoryStore::new();
        store.set(b"gone", b"x").unwrap();
        store
            .apply_batch(vec![
                (b"new".to_vec(), Some(b"1".to_vec())),
                (b"gone".to_vec(), None),
            ])
            .unwrap();
        assert_eq!(store.get(b"new").unwrap(), Some(b"1".to_vec()));
        assert!(store.get(b"gone").unwrap().is_none());
    }
}
