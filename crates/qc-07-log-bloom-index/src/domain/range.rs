//! Range bucket arithmetic
//!
//! Heights are grouped into buckets of `range_size` consecutive blocks. A
//! bucket is identified by its range key, the highest height it covers, so
//! key `K` covers `(K - range_size + 1)..=K`.

/// Bucket layout for a fixed range size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeLayout {
    size: u64,
}

impl RangeLayout {
    /// `size` must be positive; [`crate::domain::IndexConfig::validate`]
    /// guarantees this for every layout the service builds.
    pub(crate) fn new(size: u64) -> Self {
        debug_assert!(size > 0, "range size must be positive");
        Self { size }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Key of the bucket containing `height` (round up to a multiple of the range size)
    ///
    /// Heights past the last multiple of the range size that fits in a `u64`
    /// saturate to `u64::MAX`.
    pub fn range_key(&self, height: u64) -> u64 {
        if height % self.size == 0 {
            return height;
        }
        (height / self.size + 1)
            .checked_mul(self.size)
            .unwrap_or(u64::MAX)
    }

    /// First height covered by the bucket `range_key`
    pub fn range_start(&self, range_key: u64) -> u64 {
        range_key - self.size + 1
    }

    /// Height stored at 0-based `index` of the block filter list of `range_key`
    pub fn height_at(&self, range_key: u64, index: usize) -> u64 {
        self.range_start(range_key) + index as u64
    }

    /// 1-based position of `height` inside its bucket
    pub fn position(&self, height: u64) -> u64 {
        match height % self.size {
            0 => self.size,
            offset => offset,
        }
    }

    /// Whether `height` is the last height of its bucket
    pub fn closes_range(&self, height: u64) -> bool {
        height % self.size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_range_key_rounds_up() {
        let layout = RangeLayout::new(4);

        assert_eq!(layout.range_key(1), 4);
        assert_eq!(layout.range_key(3), 4);
        assert_eq!(layout.range_key(4), 4);
        assert_eq!(layout.range_key(5), 8);
        assert_eq!(layout.range_key(0), 0);
    }

    #[test]
    fn test_height_at_maps_positions() {
        let layout = RangeLayout::new(4);

        assert_eq!(layout.height_at(8, 0), 5);
        assert_eq!(layout.height_at(8, 3), 8);
        assert_eq!(layout.range_start(8), 5);
    }

    #[test]
    fn test_position_is_one_based() {
        let layout = RangeLayout::new(4);

        assert_eq!(layout.position(5), 1);
        assert_eq!(layout.position(7), 3);
        assert_eq!(layout.position(8), 4);
    }

    #[test]
    fn test_range_key_saturates_near_max() {
        let layout = RangeLayout::new(4);
        let last_key = u64::MAX - u64::MAX % 4;

        assert_eq!(layout.range_key(last_key), last_key);
        assert_eq!(layout.range_key(last_key + 1), u64::MAX);
        assert_eq!(layout.range_key(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_range_size_one() {
        let layout = RangeLayout::new(1);

        assert_eq!(layout.range_key(9), 9);
        assert!(layout.closes_range(9));
        assert_eq!(layout.position(9), 1);
    }

    proptest! {
        #[test]
        fn prop_range_key_contains_height(size in 1u64..10_000, height in 1u64..(1u64 << 40)) {
            let layout = RangeLayout::new(size);
            let key = layout.range_key(height);

            prop_assert_eq!(key % size, 0);
            prop_assert!(key - size < height);
            prop_assert!(height <= key);
        }

        #[test]
        fn prop_position_round_trips(size in 1u64..10_000, height in 1u64..(1u64 << 40)) {
            let layout = RangeLayout::new(size);
            let key = layout.range_key(height);
            let index = (layout.position(height) - 1) as usize;

            prop_assert_eq!(layout.height_at(key, index), height);
        }
    }
}
