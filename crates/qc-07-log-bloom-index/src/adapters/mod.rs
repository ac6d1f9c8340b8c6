//! Adapters Layer
//!
//! Implementations of the outbound `KeyValueStore` port:
//! - `InMemoryKVStore`: tests and ephemeral nodes
//! - `RocksDbStore`: production storage (feature `rocksdb`)

pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocksdb;

pub use memory::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDbConfig, RocksDbStore};
