//! Inbound Ports (Driving Ports)
//!
//! The API the block feed and query callers use.

use crate::domain::{Block, BloomFilter};
use crate::error::IndexResult;
use crate::ports::BloomMatcher;

/// Indexer driven by block synchronization
///
/// The block feed calls `put_block` once per new block, in height order,
/// and `delete_tip_block` once per discarded tip block on reorganization.
pub trait BlockIndexer: Send + Sync {
    /// Open the store and recover the in-progress range
    fn start(&self) -> IndexResult<()>;

    /// Release the store; all committed state is already durable
    fn stop(&self) -> IndexResult<()>;

    /// Highest committed height
    fn height(&self) -> IndexResult<u64>;

    /// Index the next block (`height == tip + 1`)
    fn put_block(&self, block: &Block) -> IndexResult<()>;

    /// Roll back the tip block (`height == tip`)
    ///
    /// Discards the whole range bucket containing the tip: the tip becomes
    /// the end of the previous bucket and every block of the discarded
    /// bucket must be fed again.
    fn delete_tip_block(&self, block: &Block) -> IndexResult<()>;
}

/// Two-tier bloom filter index over block logs
pub trait BloomFilterIndexer: BlockIndexer {
    /// Number of blocks aggregated into each range-level filter
    fn range_bloom_filter_size(&self) -> u64;

    /// Block-level filter of one indexed height
    fn bloom_filter_by_height(&self, height: u64) -> IndexResult<BloomFilter>;

    /// Heights in `[start, end]` whose block-level filter matches, ascending
    ///
    /// May contain false positives, never false negatives.
    fn filter_blocks_in_range(
        &self,
        filter: &dyn BloomMatcher,
        start: u64,
        end: u64,
    ) -> IndexResult<Vec<u64>>;
}
