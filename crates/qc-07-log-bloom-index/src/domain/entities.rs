//! Chain data consumed by the index
//!
//! Only the parts of a block the index reads: its height and the
//! address/topics of every log in its receipts.

use serde::{Deserialize, Serialize};

/// 20-byte account/contract address
pub type Address = [u8; 20];

/// 32-byte hash (log topics)
pub type Hash = [u8; 32];

/// A log entry emitted during transaction execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// Address that emitted the log
    pub address: Address,
    /// Indexed topics, in emission order
    pub topics: Vec<Hash>,
}

impl Log {
    pub fn new(address: Address, topics: Vec<Hash>) -> Self {
        Self { address, topics }
    }
}

/// Transaction receipt (logs only)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn new(logs: Vec<Log>) -> Self {
        Self { logs }
    }
}

/// A block as delivered by the block feed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub receipts: Vec<Receipt>,
}

impl Block {
    pub fn new(height: u64, receipts: Vec<Receipt>) -> Self {
        Self { height, receipts }
    }

    /// Iterate over every log of every receipt
    pub fn logs(&self) -> impl Iterator<Item = &Log> {
        self.receipts.iter().flat_map(|r| r.logs.iter())
    }
}
