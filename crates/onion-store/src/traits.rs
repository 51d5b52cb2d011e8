//! KvStore trait: the abstract interface for application state.
//!
//! Every module keeps its durable state in one ordered key-value space.
//! Implementations include SQLite (durable), in-memory (tests) and
//! [`Branch`](crate::branch::Branch) (a scratch overlay on another store).

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// A set of pending writes. `None` deletes the key.
pub type WriteBatch = Vec<(Vec<u8>, Option<Vec<u8>>)>;

/// Ordered key-value state.
///
/// Keys compare as raw bytes, so [`KvStore::prefix_scan`] returns entries in
/// lexicographic key order for every implementation.
pub trait KvStore {
    /// Read a value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Insert or overwrite a value.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// All entries whose key starts with `prefix`, sorted by key.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Apply a batch of writes.
    ///
    /// Durable backends override this to make the batch atomic.
    fn apply_batch(&mut self, batch: WriteBatch) -> Result<()> {
        for (key, value) in batch {
            match value {
                Some(v) => self.set(&key, &v)?,
                None => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

/// Extension trait for reading and writing CBOR-encoded records.
pub trait StoreExt: KvStore {
    /// Read and decode a record.
    fn get_record<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) => decode_record(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Encode and write a record.
    fn set_record<T: Serialize>(&mut self, key: &[u8], record: &T) -> Result<()> {
        let bytes = encode_record(record)?;
        self.set(key, &bytes)
    }

    /// Decode every record under a prefix, in key order.
    fn scan_records<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>> {
        self.prefix_scan(prefix)?
            .iter()
            .map(|(_, v)| decode_record(v))
            .collect()
    }
}

impl<S: KvStore + ?Sized> StoreExt for S {}

/// Encode a record to CBOR.
pub fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(record, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

/// Decode a record from CBOR.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Build a namespaced key: `prefix || suffix`.
pub fn prefixed_key(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);
    key
}

/// Smallest key greater than every key starting with `prefix`, if any.
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xff {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_end() {
        assert_eq!(prefix_end(b"ab"), Some(b"ac".to_vec()));
        assert_eq!(prefix_end(&[0x01, 0xff]), Some(vec![0x02]));
        assert_eq!(prefix_end(&[0xff, 0xff]), None);
        assert_eq!(prefix_end(b""), None);
    }

    #[test]
    fn test_record_roundtrip() {
        let bytes = encode_record(&(7u64, "seven".to_string())).unwrap();
        let back: (u64, String) = decode_record(&bytes).unwrap();
        assert_eq!(back, (7, "seven".to_string()));
    }

    #[test]
    fn test_decode_garbage_is_serialization_error() {
        let res: Result<u64> = decode_record(&[0xff, 0xff]);
        assert!(matches!(res, Err(StoreError::Serialization(_))));
    }
}
