//! Service Layer
//!
//! The indexing engine implementing the inbound ports.

pub mod bloom_index_service;

pub use bloom_index_service::BloomIndexService;
