//! Index configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use qc_07_log_bloom_index::domain::IndexConfigBuilder;
//!
//! let config = IndexConfigBuilder::new()
//!     .range_size(1000)
//!     .build()
//!     .expect("Valid config");
//! ```

use serde::{Deserialize, Serialize};

use super::range::RangeLayout;
use crate::error::IndexError;

/// Default number of blocks aggregated into one range bucket
pub const DEFAULT_RANGE_SIZE: u64 = 1000;

/// Bloom index configuration
///
/// `range_size` is fixed for the lifetime of a store: reopening a store
/// with a different value misreads every persisted bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Consecutive block heights per range bucket
    pub range_size: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            range_size: DEFAULT_RANGE_SIZE,
        }
    }
}

impl IndexConfig {
    /// Create a new configuration with validation
    pub fn new(range_size: u64) -> Result<Self, IndexError> {
        let config = Self { range_size };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.range_size == 0 {
            return Err(IndexError::InvalidConfig(
                "range_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the range size
    pub fn with_range_size(mut self, range_size: u64) -> Self {
        self.range_size = range_size;
        self
    }

    pub(crate) fn layout(&self) -> RangeLayout {
        RangeLayout::new(self.range_size)
    }
}

/// Builder for IndexConfig with validation
#[derive(Default)]
pub struct IndexConfigBuilder {
    range_size: Option<u64>,
}

impl IndexConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range_size(mut self, range_size: u64) -> Self {
        self.range_size = Some(range_size);
        self
    }

    /// Build and validate; unset fields take their defaults
    pub fn build(self) -> Result<IndexConfig, IndexError> {
        IndexConfig::new(self.range_size.unwrap_or(DEFAULT_RANGE_SIZE))
    }
}
