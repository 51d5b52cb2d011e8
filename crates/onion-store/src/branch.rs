//! Scratch branches: a write overlay on top of another store.
//!
//! Reads see the parent plus the branch's own writes. Nothing reaches the
//! parent until [`Branch::commit`]; dropping the branch (or calling
//! [`Branch::discard`]) throws its writes away. Branches nest: a branch over
//! a branch commits into the outer branch only.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::traits::{KvStore, WriteBatch};

/// A discardable write overlay over a parent store.
pub struct Branch<'a, S: KvStore + ?Sized> {
    parent: &'a mut S,
    /// Pending writes; `None` is a pending delete.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> Branch<'a, S> {
    /// Open a branch over `parent`.
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of keys written or deleted in this branch.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Write all pending changes to the parent.
    pub fn commit(self) -> Result<()> {
        let count = self.writes.len();
        let batch: WriteBatch = self.writes.into_iter().collect();
        self.parent.apply_batch(batch)?;
        tracing::trace!(writes = count, "branch committed");
        Ok(())
    }

    /// Drop all pending changes.
    pub fn discard(self) {
        tracing::trace!(writes = self.writes.len(), "branch discarded");
    }
}

impl<'a, S: KvStore + ?Sized> KvStore for Branch<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(pending) => Ok(pending.clone()),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.prefix_scan(prefix)?.into_iter().collect();

        let overlay = self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix));
        for (key, pending) in overlay {
            match pending {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(b"k/a", b"1").unwrap();
        store.set(b"k/b", b"2").unwrap();
        store
    }

    #[test]
    fn test_branch_reads_through() {
        let mut store = seeded();
        let branch = Branch::new(&mut store);
        assert_eq!(branch.get(b"k/a").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_discard_leaves_parent_untouched() {
        let mut store = seeded();
        {
            let mut branch = Branch::new(&mut store);
            branch.set(b"k/a", b"changed").unwrap();
            branch.set(b"k/c", b"3").unwrap();
            branch.delete(b"k/b").unwrap();
            assert_eq!(branch.get(b"k/a").unwrap(), Some(b"changed".to_vec()));
            assert!(branch.get(b"k/b").unwrap().is_none());
            branch.discard();
        }
        assert_eq!(store.get(b"k/a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"k/b").unwrap(), Some(b"2".to_vec()));
        assert!(store.get(b"k/c").unwrap().is_none());
    }

    #[test]
    fn test_drop_discards() {
        let mut store = seeded();
        {
            let mut branch = Branch::new(&mut store);
            branch.set(b"k/z", b"9").unwrap();
        }
        assert!(store.get(b"k/z").unwrap().is_none());
    }

    #[test]
    fn test_commit_applies_writes_and_deletes() {
        let mut store = seeded();
        let mut branch = Branch::new(&mut store);
        branch.set(b"k/c", b"3").unwrap();
        branch.delete(b"k/a").unwrap();
        assert_eq!(branch.pending_writes(), 2);
        branch.commit().unwrap();

        assert!(store.get(b"k/a").unwrap().is_none());
        assert_eq!(store.get(b"k/c").unwrap(), Some(b"3".to_vec()));
    }

    #[test]
    fn test_prefix_scan_merges_overlay() {
        let mut store = seeded();
        store.set(b"other", b"x").unwrap();

        let mut branch = Branch::new(&mut store);
        branch.delete(b"k/a").unwrap();
        branch.set(b"k/0", b"0").unwrap();
        branch.set(b"k/b", b"22").unwrap();

        let scanned = branch.prefix_scan(b"k/").unwrap();
        assert_eq!(
            scanned,
            vec![
                (b"k/0".to_vec(), b"0".to_vec()),
                (b"k/b".to_vec(), b"22".to_vec()),
            ]
        );
    }

    #[test]
    fn test_nested_branch_commits_into_outer_only() {
        let mut store = seeded();
        let mut outer = Branch::new(&mut store);
        {
            let mut inner = Branch::new(&mut outer);
            inner.set(b"k/n", b"nested").unwrap();
            inner.commit().unwrap();
        }
        assert_eq!(outer.get(b"k/n").unwrap(), Some(b"nested".to_vec()));
        outer.discard();
        assert!(store.get(b"k/n").unwrap().is_none());
    }

    proptest::proptest! {
        #[test]
        fn test_commit_matches_direct_writes(
            ops in proptest::collection::vec((0u8..8, proptest::option::of(0u8..4)), 0..32)
        ) {
            let mut direct = seeded();
            let mut via_branch = seeded();

            let mut branch = Branch::new(&mut via_branch);
            for (k, v) in &ops {
                let key = [b'k', b'/', b'a' + *k];
                match v {
                    Some(v) => {
                        direct.set(&key, &[*v]).unwrap();
                        branch.set(&key, &[*v]).unwrap();
                    }
                    None => {
                        direct.delete(&key).unwrap();
                        branch.delete(&key).unwrap();
                    }
                }
            }
            proptest::prop_assert_eq!(
                branch.prefix_scan(b"k/").unwrap(),
                direct.prefix_scan(b"k/").unwrap()
            );
            branch.commit().unwrap();

            proptest::prop_assert_eq!(
                via_branch.prefix_scan(b"").unwrap(),
                direct.prefix_scan(b"").unwrap()
            );
        }
    }

    #[test]
    fn test_branch_over_dyn_store() {
        let mut store = seeded();
        let state: &mut dyn KvStore = &mut store;
        let mut branch = Branch::new(state);
        branch.set(b"k/d", b"4").unwrap();
        branch.commit().unwrap();
        assert_eq!(store.get(b"k/d").unwrap(), Some(b"4".to_vec()));
    }
}
