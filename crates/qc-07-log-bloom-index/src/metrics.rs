//! Counters for indexing and query activity
//!
//! ## Usage
//!
//! ```ignore
//! let snapshot = service.metrics().snapshot();
//! println!("quick-reject ratio: {:.2}", snapshot.quick_reject_ratio());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for the bloom index
#[derive(Debug, Default)]
pub struct IndexMetrics {
    /// Blocks committed by `put_block`
    pub blocks_indexed: AtomicU64,
    /// Range buckets closed (last height of the bucket committed)
    pub ranges_closed: AtomicU64,
    /// Tip rollbacks performed
    pub rollbacks: AtomicU64,
    /// Committed blocks discarded by rollbacks
    pub blocks_discarded: AtomicU64,
    /// Range queries answered
    pub queries: AtomicU64,
    /// Range buckets skipped by the range-level test
    pub ranges_rejected: AtomicU64,
    /// Range buckets whose block-level filters were inspected
    pub ranges_scanned: AtomicU64,
    /// Block-level filters tested
    pub block_filters_tested: AtomicU64,
    /// Heights returned by queries
    pub heights_matched: AtomicU64,
}

impl IndexMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_block_indexed(&self, closed_range: bool) {
        self.blocks_indexed.fetch_add(1, Ordering::Relaxed);
        if closed_range {
            self.ranges_closed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_rollback(&self, discarded_blocks: u64) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
        self.blocks_discarded
            .fetch_add(discarded_blocks, Ordering::Relaxed);
    }

    /// Record one finished query
    pub fn record_query(&self, stats: &QueryStats) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.ranges_rejected
            .fetch_add(stats.ranges_rejected, Ordering::Relaxed);
        self.ranges_scanned
            .fetch_add(stats.ranges_scanned, Ordering::Relaxed);
        self.block_filters_tested
            .fetch_add(stats.block_filters_tested, Ordering::Relaxed);
        self.heights_matched
            .fetch_add(stats.heights_matched, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            blocks_indexed: self.blocks_indexed.load(Ordering::Relaxed),
            ranges_closed: self.ranges_closed.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
            blocks_discarded: self.blocks_discarded.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            ranges_rejected: self.ranges_rejected.load(Ordering::Relaxed),
            ranges_scanned: self.ranges_scanned.load(Ordering::Relaxed),
            block_filters_tested: self.block_filters_tested.load(Ordering::Relaxed),
            heights_matched: self.heights_matched.load(Ordering::Relaxed),
        }
    }
}

/// Per-query work counters, folded into [`IndexMetrics`] once the query ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub ranges_rejected: u64,
    pub ranges_scanned: u64,
    pub block_filters_tested: u64,
    pub heights_matched: u64,
}

/// Point-in-time copy of the counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub blocks_indexed: u64,
    pub ranges_closed: u64,
    pub rollbacks: u64,
    pub blocks_discarded: u64,
    pub queries: u64,
    pub ranges_rejected: u64,
    pub ranges_scanned: u64,
    pub block_filters_tested: u64,
    pub heights_matched: u64,
}

impl MetricsSnapshot {
    /// Share of visited range buckets skipped without loading block-level filters
    pub fn quick_reject_ratio(&self) -> f64 {
        let visited = self.ranges_rejected + self.ranges_scanned;
        if visited == 0 {
            return 0.0;
        }
        self.ranges_rejected as f64 / visited as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = IndexMetrics::new();

        metrics.record_block_indexed(false);
        metrics.record_block_indexed(true);
        metrics.record_rollback(3);
        metrics.record_query(&QueryStats {
            ranges_rejected: 3,
            ranges_scanned: 1,
            block_filters_tested: 4,
            heights_matched: 1,
        });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.blocks_indexed, 2);
        assert_eq!(snapshot.ranges_closed, 1);
        assert_eq!(snapshot.rollbacks, 1);
        assert_eq!(snapshot.blocks_discarded, 3);
        assert_eq!(snapshot.queries, 1);
        assert_eq!(snapshot.block_filters_tested, 4);
        assert!((snapshot.quick_reject_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quick_reject_ratio_without_queries() {
        assert_eq!(MetricsSnapshot::default().quick_reject_ratio(), 0.0);
    }
}
