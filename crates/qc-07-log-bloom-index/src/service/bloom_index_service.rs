//! Bloom Index Service
//!
//! The indexing engine. Owns the accumulator for the range bucket being
//! built and keeps three pieces of state consistent across append,
//! rollback and restart:
//!
//! - the in-memory accumulator (range-level filter + block-level list)
//! - the persisted tip height
//! - the persisted filters of every range bucket
//!
//! Every commit rewrites the full range-level filter and block-level list
//! of the current bucket together with the tip, in one atomic batch, so a
//! partially built bucket can always be recovered from the store alone.

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::keys::{
    decode_height, encode_u64, BLOCK_BLOOM_FILTER_NAMESPACE, CURRENT_HEIGHT_KEY,
    RANGE_BLOOM_FILTER_NAMESPACE,
};
use crate::domain::{
    block_filter, fold_into_range_filter, Block, BlockLevelFilters, BloomFilter, IndexConfig,
    RangeLayout,
};
use crate::error::{IndexError, IndexResult};
use crate::metrics::{IndexMetrics, QueryStats};
use crate::ports::{
    BatchOperation, BlockIndexer, BloomFilterIndexer, BloomMatcher, KeyValueStore,
};

/// In-memory state of the range bucket being built
#[derive(Clone, Debug)]
struct Accumulator {
    /// Highest committed height
    tip: u64,
    range_filter: BloomFilter,
    block_filters: BlockLevelFilters,
}

impl Accumulator {
    /// Fresh accumulator for the bucket following `tip`
    fn empty(tip: u64) -> Self {
        Self {
            tip,
            range_filter: BloomFilter::default(),
            block_filters: BlockLevelFilters::new(),
        }
    }

    fn append(&mut self, block: &Block) {
        fold_into_range_filter(&mut self.range_filter, block);
        self.block_filters.push(block_filter(block));
        self.tip = block.height;
    }
}

/// Two-tier bloom filter index backed by a key-value store
///
/// Writers (`start`, `stop`, `put_block`, `delete_tip_block`) take the
/// state lock exclusively; queries share it, so queries run concurrently
/// with each other but never with a write.
pub struct BloomIndexService<S: KeyValueStore> {
    store: S,
    config: IndexConfig,
    layout: RangeLayout,
    /// `None` until started
    state: RwLock<Option<Accumulator>>,
    metrics: IndexMetrics,
}

impl<S: KeyValueStore> BloomIndexService<S> {
    /// Create an index over `store`; call `start()` before use
    pub fn new(store: S, config: IndexConfig) -> IndexResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            layout: config.layout(),
            config,
            state: RwLock::new(None),
            metrics: IndexMetrics::new(),
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn metrics(&self) -> &IndexMetrics {
        &self.metrics
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_range_filter(&self, range_key: u64) -> IndexResult<Option<BloomFilter>> {
        self.store
            .get(RANGE_BLOOM_FILTER_NAMESPACE, &encode_u64(range_key))?
            .map(|bytes| BloomFilter::from_index_bytes(&bytes).map_err(IndexError::from))
            .transpose()
    }

    fn load_block_filters(&self, range_key: u64) -> IndexResult<Option<BlockLevelFilters>> {
        debug_assert_eq!(range_key % self.layout.size(), 0);
        self.store
            .get(BLOCK_BLOOM_FILTER_NAMESPACE, &encode_u64(range_key))?
            .map(|bytes| BlockLevelFilters::deserialize(&bytes))
            .transpose()
    }

    /// Rebuild the accumulator of a partially built bucket ending past `tip`
    fn recover(&self, tip: u64) -> IndexResult<Accumulator> {
        let range_key = self.layout.range_key(tip);
        let range_filter = self.load_range_filter(range_key)?.ok_or_else(|| {
            IndexError::Corruption(format!(
                "tip {} is inside range {} but its range filter is missing",
                tip, range_key
            ))
        })?;
        let block_filters = self.load_block_filters(range_key)?.ok_or_else(|| {
            IndexError::Corruption(format!(
                "tip {} is inside range {} but its block filters are missing",
                tip, range_key
            ))
        })?;

        let expected = self.layout.position(tip) as usize;
        if block_filters.len() != expected {
            return Err(IndexError::Corruption(format!(
                "range {} holds {} block filters, expected {} for tip {}",
                range_key,
                block_filters.len(),
                expected,
                tip
            )));
        }

        info!(
            tip,
            range_key,
            blocks = expected,
            "[qc-07] Recovered partially built range"
        );
        Ok(Accumulator {
            tip,
            range_filter,
            block_filters,
        })
    }

    /// Persist the accumulator's bucket and tip in one atomic batch
    fn commit(&self, range_key: u64, acc: &Accumulator) -> IndexResult<()> {
        let key = encode_u64(range_key);
        let operations = vec![
            BatchOperation::put(
                RANGE_BLOOM_FILTER_NAMESPACE,
                key,
                acc.range_filter.to_bytes(),
            ),
            BatchOperation::put(
                BLOCK_BLOOM_FILTER_NAMESPACE,
                key,
                acc.block_filters.serialize()?,
            ),
            BatchOperation::put(
                RANGE_BLOOM_FILTER_NAMESPACE,
                CURRENT_HEIGHT_KEY,
                encode_u64(acc.tip),
            ),
        ];
        self.store.atomic_batch_write(operations)?;
        Ok(())
    }
}

impl<S: KeyValueStore> BlockIndexer for BloomIndexService<S> {
    fn start(&self) -> IndexResult<()> {
        let mut state = self.state.write();
        self.store.start()?;

        let acc = match self
            .store
            .get(RANGE_BLOOM_FILTER_NAMESPACE, CURRENT_HEIGHT_KEY)?
        {
            None => {
                self.store.atomic_batch_write(vec![BatchOperation::put(
                    RANGE_BLOOM_FILTER_NAMESPACE,
                    CURRENT_HEIGHT_KEY,
                    encode_u64(0),
                )])?;
                info!(
                    range_size = self.layout.size(),
                    "[qc-07] Initialized empty bloom index"
                );
                Accumulator::empty(0)
            }
            Some(bytes) => {
                let tip = decode_height(&bytes)?;
                if self.layout.closes_range(tip) {
                    info!(tip, "[qc-07] Bloom index started on a closed range");
                    Accumulator::empty(tip)
                } else {
                    self.recover(tip)?
                }
            }
        };

        *state = Some(acc);
        Ok(())
    }

    fn stop(&self) -> IndexResult<()> {
        let mut state = self.state.write();
        self.store.stop()?;
        if let Some(acc) = state.take() {
            info!(tip = acc.tip, "[qc-07] Bloom index stopped");
        }
        Ok(())
    }

    fn height(&self) -> IndexResult<u64> {
        self.state
            .read()
            .as_ref()
            .map(|acc| acc.tip)
            .ok_or(IndexError::NotStarted)
    }

    fn put_block(&self, block: &Block) -> IndexResult<()> {
        let mut state = self.state.write();
        let acc = state.as_mut().ok_or(IndexError::NotStarted)?;

        let expected = acc.tip + 1;
        if block.height != expected {
            return Err(IndexError::NonSequentialHeight {
                expected,
                got: block.height,
            });
        }

        // Stage on a copy so a failed commit leaves the accumulator untouched
        let mut staged = acc.clone();
        staged.append(block);
        let range_key = self.layout.range_key(block.height);
        self.commit(range_key, &staged)?;

        let closes_range = self.layout.closes_range(block.height);
        if closes_range {
            staged = Accumulator::empty(block.height);
            info!(range_key, "[qc-07] Closed range bucket");
        }
        *acc = staged;

        self.metrics.record_block_indexed(closes_range);
        debug!(height = block.height, range_key, "[qc-07] Indexed block");
        Ok(())
    }

    fn delete_tip_block(&self, block: &Block) -> IndexResult<()> {
        let mut state = self.state.write();
        let acc = state.as_mut().ok_or(IndexError::NotStarted)?;

        if acc.tip == 0 || block.height != acc.tip {
            return Err(IndexError::TipMismatch {
                height: block.height,
                tip: acc.tip,
            });
        }

        let range_key = self.layout.range_key(block.height);
        let new_tip = range_key - self.layout.size();
        let key = encode_u64(range_key);
        self.store.atomic_batch_write(vec![
            BatchOperation::delete(RANGE_BLOOM_FILTER_NAMESPACE, key),
            BatchOperation::delete(BLOCK_BLOOM_FILTER_NAMESPACE, key),
            BatchOperation::put(
                RANGE_BLOOM_FILTER_NAMESPACE,
                CURRENT_HEIGHT_KEY,
                encode_u64(new_tip),
            ),
        ])?;
        *acc = Accumulator::empty(new_tip);

        let discarded = block.height - new_tip;
        if discarded > 1 {
            warn!(
                height = block.height,
                new_tip,
                discarded,
                "[qc-07] Rollback discarded the whole range bucket; blocks from {} must be re-indexed",
                new_tip + 1
            );
        } else {
            info!(height = block.height, new_tip, "[qc-07] Rolled back tip block");
        }
        self.metrics.record_rollback(discarded);
        Ok(())
    }
}

impl<S: KeyValueStore> BloomFilterIndexer for BloomIndexService<S> {
    fn range_bloom_filter_size(&self) -> u64 {
        self.layout.size()
    }

    fn bloom_filter_by_height(&self, height: u64) -> IndexResult<BloomFilter> {
        if height == 0 {
            return Err(IndexError::InvalidQueryRange {
                start: height,
                end: height,
            });
        }
        let state = self.state.read();
        if state.is_none() {
            return Err(IndexError::NotStarted);
        }

        let range_key = self.layout.range_key(height);
        let index = (self.layout.position(height) - 1) as usize;
        self.load_block_filters(range_key)?
            .and_then(|filters| filters.get(index).cloned())
            .ok_or(IndexError::HeightNotIndexed { height })
    }

    fn filter_blocks_in_range(
        &self,
        filter: &dyn BloomMatcher,
        start: u64,
        end: u64,
    ) -> IndexResult<Vec<u64>> {
        if start == 0 || end == 0 || start > end {
            return Err(IndexError::InvalidQueryRange { start, end });
        }
        let state = self.state.read();
        let tip = state.as_ref().ok_or(IndexError::NotStarted)?.tip;

        // Nothing past the tip is persisted
        let end = end.min(tip);
        if start > end {
            debug!(start, tip, "[qc-07] Query starts past the tip");
            return Ok(Vec::new());
        }

        let size = self.layout.size();
        let end_key = self.layout.range_key(end);
        let mut query_key = self.layout.range_key(start);
        let mut stats = QueryStats::default();
        let mut heights = Vec::new();

        while query_key <= end_key {
            // A missing bucket has no indexed blocks yet
            if let Some(range_filter) = self.load_range_filter(query_key)? {
                if !filter.exists_in_range_filter(&range_filter) {
                    stats.ranges_rejected += 1;
                } else {
                    stats.ranges_scanned += 1;
                    let block_filters = self.load_block_filters(query_key)?.ok_or_else(|| {
                        IndexError::Corruption(format!(
                            "range {} has a range filter but no block filters",
                            query_key
                        ))
                    })?;
                    if block_filters.len() as u64 > size {
                        return Err(IndexError::BlockFilterOverflow {
                            range_key: query_key,
                            len: block_filters.len(),
                            range_size: size,
                        });
                    }

                    for (i, bloom) in block_filters.iter().enumerate() {
                        let height = self.layout.height_at(query_key, i);
                        if height < start || height > end {
                            continue;
                        }
                        stats.block_filters_tested += 1;
                        if filter.exists_in_block_filter(bloom) {
                            heights.push(height);
                        }
                    }
                }
            }
            query_key = match query_key.checked_add(size) {
                Some(next) => next,
                None => break,
            };
        }

        stats.heights_matched = heights.len() as u64;
        self.metrics.record_query(&stats);
        debug!(
            start,
            end,
            matched = heights.len(),
            ranges_rejected = stats.ranges_rejected,
            ranges_scanned = stats.ranges_scanned,
            "[qc-07] Filtered blocks in range"
        );
        Ok(heights)
    }
}
