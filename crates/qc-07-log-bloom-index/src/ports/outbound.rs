//! Outbound Ports (Driven Ports)
//!
//! Dependencies the index needs from the host: a namespaced key-value
//! store and the filter expression tested against stored filters.

use std::sync::Arc;

use crate::domain::BloomFilter;
use crate::error::KVStoreError;

/// Namespaced key-value store with atomic batch writes
///
/// Production: `RocksDbStore` (feature `rocksdb`)
/// Testing: `InMemoryKVStore`
///
/// A missing key is `Ok(None)`, never an error.
pub trait KeyValueStore: Send + Sync {
    /// Acquire the underlying resources
    fn start(&self) -> Result<(), KVStoreError> {
        Ok(())
    }

    /// Release the underlying resources
    fn stop(&self) -> Result<(), KVStoreError> {
        Ok(())
    }

    /// Get a value by namespace and key.
    fn get(&self, namespace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key. Deleting a missing key succeeds.
    fn delete(&self, namespace: &str, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are.
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn start(&self) -> Result<(), KVStoreError> {
        (**self).start()
    }

    fn stop(&self) -> Result<(), KVStoreError> {
        (**self).stop()
    }

    fn get(&self, namespace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(namespace, key)
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(namespace, key, value)
    }

    fn delete(&self, namespace: &str, key: &[u8]) -> Result<(), KVStoreError> {
        (**self).delete(namespace, key)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put {
        namespace: &'static str,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    /// Delete a key.
    Delete {
        namespace: &'static str,
        key: Vec<u8>,
    },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(
        namespace: &'static str,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        BatchOperation::Put {
            namespace,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(namespace: &'static str, key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete {
            namespace,
            key: key.into(),
        }
    }
}

/// Filter expression tested against stored filters
///
/// The two predicates must use the encodings the filters were built with:
/// raw topics for range-level filters, position-prefixed topics for
/// block-level filters. A mismatch produces false negatives.
pub trait BloomMatcher {
    /// Coarse test against a range-level filter
    fn exists_in_range_filter(&self, bloom: &BloomFilter) -> bool;

    /// Precise test against a block-level filter
    fn exists_in_block_filter(&self, bloom: &BloomFilter) -> bool;
}
