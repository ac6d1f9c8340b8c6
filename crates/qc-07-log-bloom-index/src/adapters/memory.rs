use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};

type NamespacedKey = (String, Vec<u8>);

/// In-memory key-value store for tests and ephemeral nodes.
///
/// Batches are applied under a single write lock, so readers observe all
/// of a batch or none of it. Closed until `start()` is called.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: RwLock<HashMap<NamespacedKey, Vec<u8>>>,
    open: AtomicBool,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across all namespaces
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn ensure_open(&self) -> Result<(), KVStoreError> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(KVStoreError::Closed)
        }
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn start(&self) -> Result<(), KVStoreError> {
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&self) -> Result<(), KVStoreError> {
        self.open.store(false, Ordering::Release);
        Ok(())
    }

    fn get(&self, namespace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.ensure_open()?;
        Ok(self
            .data
            .read()
            .get(&(namespace.to_string(), key.to_vec()))
            .cloned())
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.ensure_open()?;
        self.data
            .write()
            .insert((namespace.to_string(), key.to_vec()), value.to_vec());
        Ok(())
    }

    fn delete(&self, namespace: &str, key: &[u8]) -> Result<(), KVStoreError> {
        self.ensure_open()?;
        self.data
            .write()
            .remove(&(namespace.to_string(), key.to_vec()));
        Ok(())
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.ensure_open()?;
        let mut data = self.data.write();
        for op in operations {
            match op {
                BatchOperation::Put {
                    namespace,
                    key,
                    value,
                } => {
                    data.insert((namespace.to_string(), key), value);
                }
                BatchOperation::Delete { namespace, key } => {
                    data.remove(&(namespace.to_string(), key));
                }
            }
        }
        Ok(())
    }
}
