//! Core Bloom filter implementation
//!
//! Every filter in the index shares the same parameters:
//! [`BLOOM_FILTER_BITS`] bits and [`BLOOM_FILTER_HASHES`] hash functions.
//!
//! INVARIANTS:
//! - No false negatives: if inserted, `contains()` MUST return true
//! - `from_bytes(to_bytes(f))` tests positive for exactly the same elements as `f`

use bitvec::prelude::*;

use super::hash_functions::compute_hash_positions;
use crate::error::FilterError;

/// Bit width of every filter in the index
pub const BLOOM_FILTER_BITS: usize = 2048;

/// Hash function count of every filter in the index
pub const BLOOM_FILTER_HASHES: usize = 3;

/// Bloom filter for probabilistic membership testing
///
/// False positives are possible, false negatives are not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new(BLOOM_FILTER_BITS, BLOOM_FILTER_HASHES)
    }
}

impl BloomFilter {
    /// Create an empty filter of `m` bits with `k` hash functions
    pub fn new(m: usize, k: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
            m,
        }
    }

    /// Insert an element into the filter
    pub fn insert(&mut self, element: &[u8]) {
        for pos in compute_hash_positions(element, self.k, self.m) {
            self.bits.set(pos, true);
        }
    }

    /// Test if an element might be in the filter
    ///
    /// `false` means the element is definitely absent.
    pub fn contains(&self, element: &[u8]) -> bool {
        compute_hash_positions(element, self.k, self.m)
            .iter()
            .all(|&pos| self.bits[pos])
    }

    /// Whether no element has been inserted
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Serialize the filter as its raw bit array
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.as_raw_slice().to_vec()
    }

    /// Rebuild a filter from its raw bit array
    ///
    /// Malformed input is reported, never panics.
    pub fn from_bytes(bytes: &[u8], m: usize, k: usize) -> Result<Self, FilterError> {
        if m == 0 || k == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "m and k must be positive (m={}, k={})",
                m, k
            )));
        }
        let expected = m.div_ceil(8);
        if bytes.len() != expected {
            return Err(FilterError::InvalidLength {
                expected,
                actual: bytes.len(),
            });
        }
        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes.to_vec());
        bits.truncate(m);
        Ok(Self { bits, k, m })
    }

    /// Rebuild a filter using the index-wide parameters
    pub fn from_index_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        Self::from_bytes(bytes, BLOOM_FILTER_BITS, BLOOM_FILTER_HASHES)
    }
}

/// Theoretical false positive rate after `n` insertions
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -((k * n) as f64) / m as f64;
    (1.0 - exponent.exp()).powi(k as i32)
}
