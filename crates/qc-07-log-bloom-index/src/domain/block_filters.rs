//! Two-tier filter contents
//!
//! - Range-level filter: log addresses and raw topic bytes of every block in
//!   a bucket (position-insensitive).
//! - Block-level filter list: one filter per block, holding log addresses
//!   and topics prefixed by their position in the log (position-sensitive).
//!
//! [`crate::domain::LogFilter`] tests each tier with the matching encoding.

use serde::{Deserialize, Serialize};

use super::bloom_filter::BloomFilter;
use super::entities::{Block, Hash};
use crate::error::IndexError;

/// Position-sensitive topic element: 8-byte big-endian index, then the topic
pub fn position_sensitive_topic(index: usize, topic: &Hash) -> Vec<u8> {
    let mut element = Vec::with_capacity(8 + topic.len());
    element.extend_from_slice(&(index as u64).to_be_bytes());
    element.extend_from_slice(topic);
    element
}

/// Add a block's log addresses and raw topics to a range-level filter
pub fn fold_into_range_filter(filter: &mut BloomFilter, block: &Block) {
    for log in block.logs() {
        filter.insert(&log.address);
        for topic in &log.topics {
            filter.insert(topic);
        }
    }
}

/// Build the block-level filter for one block
pub fn block_filter(block: &Block) -> BloomFilter {
    let mut filter = BloomFilter::default();
    for log in block.logs() {
        filter.insert(&log.address);
        for (i, topic) in log.topics.iter().enumerate() {
            filter.insert(&position_sensitive_topic(i, topic));
        }
    }
    filter
}

/// Persisted form: one repeated byte-string field
#[derive(Serialize, Deserialize)]
struct BlockLevelFiltersRecord {
    block_blooms: Vec<Vec<u8>>,
}

/// Ordered block-level filters of one range bucket, ascending by height
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockLevelFilters {
    blooms: Vec<BloomFilter>,
}

impl BlockLevelFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: BloomFilter) {
        self.blooms.push(filter);
    }

    pub fn len(&self) -> usize {
        self.blooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blooms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BloomFilter> {
        self.blooms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BloomFilter> {
        self.blooms.iter()
    }

    pub fn into_inner(self) -> Vec<BloomFilter> {
        self.blooms
    }

    pub fn serialize(&self) -> Result<Vec<u8>, IndexError> {
        let record = BlockLevelFiltersRecord {
            block_blooms: self.blooms.iter().map(BloomFilter::to_bytes).collect(),
        };
        bincode::serialize(&record).map_err(|e| IndexError::Serialization(e.to_string()))
    }

    /// Decode a persisted list, rebuilding each entry with the index-wide parameters
    pub fn deserialize(bytes: &[u8]) -> Result<Self, IndexError> {
        let record: BlockLevelFiltersRecord =
            bincode::deserialize(bytes).map_err(|e| IndexError::Serialization(e.to_string()))?;
        let blooms = record
            .block_blooms
            .iter()
            .map(|raw| BloomFilter::from_index_bytes(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blooms })
    }
}
