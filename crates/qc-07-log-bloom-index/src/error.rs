//! Error types for the log bloom index

use thiserror::Error;

/// Errors from the key-value store collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    #[error("KV store is not open")]
    Closed,
}

/// Errors decoding or constructing a bloom filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid filter length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),
}

/// Errors surfaced by the indexing engine
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Indexer has not been started")]
    NotStarted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid query range: start={start}, end={end} (heights start at 1 and start <= end)")]
    InvalidQueryRange { start: u64, end: u64 },

    #[error("Non-sequential block height: expected {expected}, got {got}")]
    NonSequentialHeight { expected: u64, got: u64 },

    #[error("Cannot delete block {height}: current tip is {tip}")]
    TipMismatch { height: u64, tip: u64 },

    #[error("Block filter list for range {range_key} has {len} entries, more than range size {range_size}")]
    BlockFilterOverflow {
        range_key: u64,
        len: usize,
        range_size: u64,
    },

    #[error("Index corrupted: {0}")]
    Corruption(String),

    #[error("Height {height} is not indexed")]
    HeightNotIndexed { height: u64 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Bloom filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Store error: {0}")]
    Store(#[from] KVStoreError),
}

pub type IndexResult<T> = Result<T, IndexError>;
