//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Bloom filter primitive and hash functions
//! - Range bucket arithmetic and store key encoding
//! - Two-tier filter contents and their persisted encoding
//! - Log filter expression
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No locking

pub mod block_filters;
pub mod bloom_filter;
pub mod config;
pub mod entities;
pub mod hash_functions;
pub mod keys;
pub mod log_filter;
pub mod range;

pub use block_filters::{
    block_filter, fold_into_range_filter, position_sensitive_topic, BlockLevelFilters,
};
pub use bloom_filter::{calculate_fpr, BloomFilter, BLOOM_FILTER_BITS, BLOOM_FILTER_HASHES};
pub use config::{IndexConfig, IndexConfigBuilder, DEFAULT_RANGE_SIZE};
pub use entities::{Address, Block, Hash, Log, Receipt};
pub use log_filter::LogFilter;
pub use range::RangeLayout;
