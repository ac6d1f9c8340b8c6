//! Store namespaces and key encoding
//!
//! Range keys and the tip height are 8-byte big-endian integers. The tip
//! marker lives in the range namespace under a textual sentinel key, which
//! can never collide with an 8-byte range key.

use crate::error::IndexError;

/// Namespace holding range-level filters and the tip height marker
pub const RANGE_BLOOM_FILTER_NAMESPACE: &str = "RangeBloomFilters";

/// Namespace holding block-level filter lists
pub const BLOCK_BLOOM_FILTER_NAMESPACE: &str = "BlockBloomFilters";

/// Sentinel key of the tip height marker
pub const CURRENT_HEIGHT_KEY: &[u8] = b"CurrentHeight";

/// Encode a range key (or height) as a store key
pub fn encode_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decode the persisted tip height
pub fn decode_height(bytes: &[u8]) -> Result<u64, IndexError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        IndexError::Corruption(format!(
            "tip height marker has {} bytes, expected 8",
            bytes.len()
        ))
    })?;
    Ok(u64::from_be_bytes(raw))
}
