//! # RocksDB Storage Adapter
//!
//! Production implementation of the KeyValueStore trait.
//!
//! ## Column Families
//!
//! One per index namespace:
//! - `RangeBloomFilters` - range-level filters and the tip height marker
//! - `BlockBloomFilters` - block-level filter lists
//!
//! Commits go through a single `WriteBatch`, so a crash never leaves a
//! range filter, its block list and the tip marker out of step.

use parking_lot::RwLock;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, WriteOptions, DB};
use std::path::Path;

use crate::domain::keys::{BLOCK_BLOOM_FILTER_NAMESPACE, RANGE_BLOOM_FILTER_NAMESPACE};
use crate::error::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};

/// Column families used by the index
pub const COLUMN_FAMILIES: &[&str] = &[RANGE_BLOOM_FILTER_NAMESPACE, BLOCK_BLOOM_FILTER_NAMESPACE];

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 32MB)
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3)
    pub max_write_buffer_number: i32,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/log-bloom-index".to_string(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 32 * 1024 * 1024,
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store
///
/// The database is opened by `start()` and closed by `stop()`.
pub struct RocksDbStore {
    db: RwLock<Option<DB>>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    pub fn new(config: RocksDbConfig) -> Self {
        Self {
            db: RwLock::new(None),
            config,
        }
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self::new(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn open(&self) -> Result<DB, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(self.config.write_buffer_size);
        opts.set_max_write_buffer_number(self.config.max_write_buffer_number);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(
            self.config.block_cache_size,
        ));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        DB::open_cf_descriptors(&opts, &self.config.path, cf_descriptors).map_err(|e| {
            KVStoreError::IOError {
                message: format!("Failed to open RocksDB at {}: {}", self.config.path, e),
            }
        })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

fn column_family<'a>(db: &'a DB, namespace: &str) -> Result<&'a ColumnFamily, KVStoreError> {
    db.cf_handle(namespace).ok_or_else(|| KVStoreError::IOError {
        message: format!("Unknown column family: {}", namespace),
    })
}

impl KeyValueStore for RocksDbStore {
    fn start(&self) -> Result<(), KVStoreError> {
        let mut guard = self.db.write();
        if guard.is_none() {
            *guard = Some(self.open()?);
            tracing::info!(path = %self.config.path, "[qc-07] Opened RocksDB store");
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), KVStoreError> {
        if let Some(db) = self.db.write().take() {
            db.flush().map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB flush failed: {}", e),
            })?;
            tracing::info!(path = %self.config.path, "[qc-07] Closed RocksDB store");
        }
        Ok(())
    }

    fn get(&self, namespace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;
        db.get_cf(column_family(db, namespace)?, key)
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB get failed: {}", e),
            })
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;
        db.put_cf_opt(column_family(db, namespace)?, key, value, &self.write_options())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB put failed: {}", e),
            })
    }

    fn delete(&self, namespace: &str, key: &[u8]) -> Result<(), KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;
        db.delete_cf_opt(column_family(db, namespace)?, key, &self.write_options())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB delete failed: {}", e),
            })
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KVStoreError::Closed)?;
        let mut batch = WriteBatch::default();

        for op in operations {
            match op {
                BatchOperation::Put {
                    namespace,
                    key,
                    value,
                } => {
                    batch.put_cf(column_family(db, namespace)?, &key, &value);
                }
                BatchOperation::Delete { namespace, key } => {
                    batch.delete_cf(column_family(db, namespace)?, &key);
                }
            }
        }

        db.write_opt(batch, &self.write_options())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB batch write failed: {}", e),
            })
    }
}
