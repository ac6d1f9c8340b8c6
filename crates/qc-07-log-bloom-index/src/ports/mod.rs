//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for the block feed and query callers
//! - Driven Ports (outbound) - Storage and filter-expression collaborators

pub mod inbound;
pub mod outbound;

pub use inbound::{BlockIndexer, BloomFilterIndexer};
pub use outbound::{BatchOperation, BloomMatcher, KeyValueStore};
