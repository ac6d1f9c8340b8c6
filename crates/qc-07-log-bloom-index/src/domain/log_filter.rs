//! Log filter expression
//!
//! Address list and per-position topic alternatives, combined with AND
//! semantics. A `None` (or empty) topic position matches anything.

use std::fmt;

use super::block_filters::position_sensitive_topic;
use super::bloom_filter::BloomFilter;
use super::entities::{Address, Hash};
use crate::ports::BloomMatcher;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Emitting addresses to match. Empty means any address.
    pub addresses: Vec<Address>,
    /// Topic alternatives by position (topic0..topicN).
    pub topics: Vec<Option<Vec<Hash>>>,
}

impl LogFilter {
    /// Create a new empty filter (matches every block)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single address
    pub fn with_address(mut self, address: Address) -> Self {
        self.addresses.push(address);
        self
    }

    /// Set the address list
    pub fn with_addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = addresses;
        self
    }

    /// Set topic alternatives by position
    pub fn with_topics(mut self, topics: Vec<Option<Vec<Hash>>>) -> Self {
        self.topics = topics;
        self
    }

    fn address_matches(&self, bloom: &BloomFilter) -> bool {
        self.addresses.is_empty() || self.addresses.iter().any(|a| bloom.contains(a))
    }

    fn topics_match<F>(&self, mut test: F) -> bool
    where
        F: FnMut(usize, &Hash) -> bool,
    {
        self.topics.iter().enumerate().all(|(i, position)| match position {
            Some(alternatives) if !alternatives.is_empty() => {
                alternatives.iter().any(|topic| test(i, topic))
            }
            _ => true,
        })
    }
}

impl BloomMatcher for LogFilter {
    fn exists_in_range_filter(&self, bloom: &BloomFilter) -> bool {
        self.address_matches(bloom) && self.topics_match(|_, topic| bloom.contains(topic))
    }

    fn exists_in_block_filter(&self, bloom: &BloomFilter) -> bool {
        self.address_matches(bloom)
            && self.topics_match(|i, topic| bloom.contains(&position_sensitive_topic(i, topic)))
    }
}

impl fmt::Display for LogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addresses: Vec<String> = self.addresses.iter().map(hex::encode).collect();
        let topics: Vec<String> = self
            .topics
            .iter()
            .map(|position| match position {
                Some(alternatives) if !alternatives.is_empty() => alternatives
                    .iter()
                    .map(hex::encode)
                    .collect::<Vec<_>>()
                    .join("|"),
                _ => "*".to_string(),
            })
            .collect();
        write!(
            f,
            "addresses=[{}] topics=[{}]",
            addresses.join(","),
            topics.join(",")
        )
    }
}
