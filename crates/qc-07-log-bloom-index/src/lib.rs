//! # QC-07 Log Bloom Index
//!
//! Secondary index over the block log answering "which blocks in
//! `[start, end]` might contain a log matching this filter?" without
//! reading receipts.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `BloomFilter`: 2048-bit, 3-hash probabilistic set
//!   - `RangeLayout`: range bucket arithmetic
//!   - `BlockLevelFilters`: per-block filters of one bucket and their encoding
//!   - `LogFilter`: address/topic filter expression
//!   - `IndexConfig`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `BlockIndexer` / `BloomFilterIndexer`: Driving ports (block feed, queries)
//!   - `KeyValueStore`, `BloomMatcher`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `BloomIndexService`: the indexing engine
//!
//! - **Adapters Layer** (`adapters/`): Storage backends
//!   - `InMemoryKVStore`, `RocksDbStore` (feature `rocksdb`)
//!
//! ## Two tiers
//!
//! Heights are grouped into buckets of `range_size` blocks. Each bucket
//! stores one range-level filter (addresses and raw topics of every block)
//! and a list of block-level filters (addresses and position-prefixed
//! topics, one per block). Queries test the range-level filter first and
//! only load block-level filters for buckets that pass.
//!
//! ## Invariants
//!
//! - The persisted tip is either the end of a bucket or inside the bucket
//!   the accumulator is building, whose block list holds exactly
//!   `tip mod range_size` filters.
//! - No false negatives: every indexed log address is found at its height.
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_07_log_bloom_index::{
//!     BlockIndexer, BloomFilterIndexer, BloomIndexService, IndexConfig, InMemoryKVStore,
//!     LogFilter,
//! };
//!
//! let index = BloomIndexService::new(InMemoryKVStore::new(), IndexConfig::new(1000)?)?;
//! index.start()?;
//! index.put_block(&block)?;
//!
//! let filter = LogFilter::new().with_address(contract);
//! let heights = index.filter_blocks_in_range(&filter, 1, index.height()?)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use domain::{
    Address, Block, BloomFilter, Hash, IndexConfig, IndexConfigBuilder, Log, LogFilter, Receipt,
};
pub use error::{FilterError, IndexError, IndexResult, KVStoreError};
pub use metrics::{IndexMetrics, MetricsSnapshot};
pub use ports::{BatchOperation, BlockIndexer, BloomFilterIndexer, BloomMatcher, KeyValueStore};
pub use service::BloomIndexService;
