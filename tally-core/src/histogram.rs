// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Sparse histogram buckets.

use hashbrown::HashMap;

/// Occurrence counts keyed by an integer bucket.
///
/// The map is sparse: a key that was never recorded reads as zero, and recording a zero
/// count does not create a bucket, including when decoding. Equality ignores insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "HashMap<i64, u64>", into = "HashMap<i64, u64>")
)]
pub struct BucketCounts {
    buckets: HashMap<i64, u64>,
}

impl BucketCounts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// The count recorded for `key`, or zero.
    pub fn get(&self, key: i64) -> u64 {
        self.buckets.get(&key).copied().unwrap_or(0)
    }

    /// Add `count` occurrences to `key`, saturating at `u64::MAX`.
    pub fn record(&mut self, key: i64, count: u64) {
        self.record_with(key, count, u64::saturating_add);
    }

    /// Add `count` occurrences to `key`, combining with the existing count using `add`.
    ///
    /// Zero counts are ignored so that empty buckets are never materialized.
    pub fn record_with(&mut self, key: i64, count: u64, add: impl FnOnce(u64, u64) -> u64) {
        if count == 0 {
            return;
        }
        match self.buckets.get_mut(&key) {
            Some(existing) => *existing = add(*existing, count),
            None => {
                self.buckets.insert(key, count);
            }
        }
    }

    /// Number of non-empty buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no bucket has been recorded.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.buckets
            .values()
            .fold(0u64, |total, count| total.saturating_add(*count))
    }

    /// Buckets in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.buckets.iter().map(|(key, count)| (*key, *count))
    }

    /// Buckets in ascending key order.
    pub fn iter_sorted(&self) -> std::vec::IntoIter<(i64, u64)> {
        let mut buckets: Vec<_> = self.iter().collect();
        buckets.sort_unstable_by_key(|(key, _)| *key);
        buckets.into_iter()
    }
}

impl FromIterator<(i64, u64)> for BucketCounts {
    fn from_iter<I: IntoIterator<Item = (i64, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        counts.extend(iter);
        counts
    }
}

impl Extend<(i64, u64)> for BucketCounts {
    fn extend<I: IntoIterator<Item = (i64, u64)>>(&mut self, iter: I) {
        for (key, count) in iter {
            self.record(key, count);
        }
    }
}

impl<const N: usize> From<[(i64, u64); N]> for BucketCounts {
    fn from(buckets: [(i64, u64); N]) -> Self {
        buckets.into_iter().collect()
    }
}

impl From<HashMap<i64, u64>> for BucketCounts {
    fn from(buckets: HashMap<i64, u64>) -> Self {
        buckets.into_iter().collect()
    }
}

impl From<BucketCounts> for HashMap<i64, u64> {
    fn from(counts: BucketCounts) -> Self {
        counts.buckets
    }
}
