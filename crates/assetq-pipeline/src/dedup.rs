//! Result deduplication by natural key.
//!
//! Order is preserved and the first row with a given key wins. Rows whose key
//! is empty are never recorded and never dropped: an asset without a URL is
//! not a duplicate of another asset without a URL.

use assetq_core::{Field, Provider, ResultRow};
use std::collections::HashSet;

/// Which value identifies a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKey {
    /// Primary link/URL
    Link,
    /// IP address
    Ip,
    /// `ip:port`
    IpPort,
}

impl DedupKey {
    /// Natural key of a provider's rows.
    #[must_use]
    pub fn natural(provider: Provider) -> Self {
        match provider {
            Provider::Fofa | Provider::Hunter => DedupKey::Link,
            Provider::Quake => DedupKey::IpPort,
        }
    }

    /// Key value of a row; empty when the row has no usable key.
    #[must_use]
    pub fn extract(self, row: &ResultRow) -> String {
        match self {
            DedupKey::Link => row.get(Field::Link).to_string(),
            DedupKey::Ip => row.get(Field::Ip).to_string(),
            DedupKey::IpPort => {
                let ip = row.get(Field::Ip);
                if ip.is_empty() {
                    String::new()
                } else {
                    format!("{ip}:{}", row.get(Field::Port))
                }
            }
        }
    }
}

/// Stateful deduplicator, fed one page at a time.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    key: DedupKey,
    seen: HashSet<String>,
}

impl Deduplicator {
    /// Create an empty deduplicator.
    #[must_use]
    pub fn new(key: DedupKey) -> Self {
        Self {
            key,
            seen: HashSet::new(),
        }
    }

    /// Keep rows whose key has not been seen on this or any earlier page.
    pub fn retain_new(&mut self, rows: Vec<ResultRow>) -> Vec<ResultRow> {
        rows.into_iter()
            .filter(|row| {
                let key = self.key.extract(row);
                key.is_empty() || self.seen.insert(key)
            })
            .collect()
    }

    /// Distinct non-empty keys seen so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Deduplicate a complete result set.
#[must_use]
pub fn dedup(rows: Vec<ResultRow>, key: DedupKey) -> Vec<ResultRow> {
    Deduplicator::new(key).retain_new(rows)
}

/// Distinct non-empty key values, in first-seen order.
#[must_use]
pub fn unique_values(rows: &[ResultRow], key: DedupKey) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|row| key.extract(row))
        .filter(|value| !value.is_empty() && seen.insert(value.clone()))
        .collect()
}
