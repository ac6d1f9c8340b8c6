//! Hash functions for the bloom filter
//!
//! MurmurHash3 (x64, 128-bit) with two seeds, combined by double hashing.

use std::io::Cursor;

/// Hash an element with MurmurHash3 and keep the lower 64 bits
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    // Reading from an in-memory cursor cannot fail.
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    hash as u64
}

/// Compute `k` bit positions in `[0, m)` for an element
///
/// Double hashing: h(i) = h1 + i * h2.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize) -> Vec<usize> {
    let h1 = murmur_hash(element, 0);
    let h2 = murmur_hash(element, 1);

    (0..k)
        .map(|i| {
            let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (hash % m as u64) as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur3_hash_deterministic() {
        let element = b"log_address_0xABCD";

        assert_eq!(
            murmur_hash(element, 7),
            murmur_hash(element, 7),
            "Same input with same seed must produce same output"
        );
    }

    #[test]
    fn test_murmur3_different_seed_different_output() {
        let element = b"log_address_0xABCD";

        assert_ne!(murmur_hash(element, 0), murmur_hash(element, 1));
    }

    #[test]
    fn test_positions_within_bounds() {
        let m = 2048;
        let positions = compute_hash_positions(b"topic_transfer", 3, m);

        assert_eq!(positions.len(), 3);
        assert!(positions.iter().all(|&p| p < m));
    }

    #[test]
    fn test_hash_uniformity() {
        let m = 2048;
        let k = 3;
        let mut counts = vec![0usize; 8];

        for i in 0..2000 {
            let element = format!("element_{}", i);
            for pos in compute_hash_positions(element.as_bytes(), k, m) {
                counts[pos / 256] += 1;
            }
        }

        // 6000 positions over 8 buckets, ~750 each
        let expected = 750;
        for (i, count) in counts.iter().enumerate() {
            assert!(
                *count >= expected / 2 && *count <= expected * 3 / 2,
                "Bucket {} has {} entries, expected ~{}",
                i,
                count,
                expected
            );
        }
    }
}
