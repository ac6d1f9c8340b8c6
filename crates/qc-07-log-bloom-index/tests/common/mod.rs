//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use qc_07_log_bloom_index::{
    Address, BatchOperation, Block, BlockIndexer, BloomIndexService, Hash, IndexConfig,
    InMemoryKVStore, KVStoreError, KeyValueStore, Log, Receipt,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn empty_block(height: u64) -> Block {
    Block::new(height, vec![])
}

pub fn block_with_log(height: u64, address: Address, topics: Vec<Hash>) -> Block {
    Block::new(height, vec![Receipt::new(vec![Log::new(address, topics)])])
}

/// In-memory store that can be told to fail reads or writes, and counts reads
#[derive(Default)]
pub struct FaultyStore {
    inner: InMemoryKVStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    /// Fail reads in this namespace only
    fail_reads_in: Mutex<Option<&'static str>>,
    reads: AtomicUsize,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads_in(&self, namespace: Option<&'static str>) {
        *self.fail_reads_in.lock() = namespace;
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<(), KVStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KVStoreError::IOError {
                message: "injected write failure".to_string(),
            });
        }
        Ok(())
    }

    fn check_read(&self, namespace: &str) -> Result<(), KVStoreError> {
        let failing_namespace = *self.fail_reads_in.lock() == Some(namespace);
        if self.fail_reads.load(Ordering::SeqCst) || failing_namespace {
            return Err(KVStoreError::IOError {
                message: format!("injected read failure in {}", namespace),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FaultyStore {
    fn start(&self) -> Result<(), KVStoreError> {
        self.inner.start()
    }

    fn stop(&self) -> Result<(), KVStoreError> {
        self.inner.stop()
    }

    fn get(&self, namespace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_read(namespace)?;
        self.inner.get(namespace, key)
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.check_write()?;
        self.inner.put(namespace, key, value)
    }

    fn delete(&self, namespace: &str, key: &[u8]) -> Result<(), KVStoreError> {
        self.check_write()?;
        self.inner.delete(namespace, key)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.check_write()?;
        self.inner.atomic_batch_write(operations)
    }
}

pub fn started_faulty_service(
    range_size: u64,
) -> (Arc<FaultyStore>, BloomIndexService<Arc<FaultyStore>>) {
    let store = Arc::new(FaultyStore::new());
    let service =
        BloomIndexService::new(store.clone(), IndexConfig::new(range_size).unwrap()).unwrap();
    service.start().unwrap();
    (store, service)
}
