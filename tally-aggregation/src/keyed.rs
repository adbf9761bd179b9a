// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Fan-in of many counters at once.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use tally_core::{AggregationError, CounterPath, MergeKind, Sample};

use crate::aggregator::{Aggregator, WindowMode};
use crate::config::AggregatorConfig;

/// One finished aggregate produced by [`KeyedAggregator::drain`].
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedSample {
    /// The counter the samples belong to.
    pub counter: CounterPath,
    /// The merged sample.
    pub sample: Sample,
    /// How many samples went into `sample`, including the seed.
    pub sources: usize,
}

/// Keeps one [`Aggregator`] per counter and kind.
///
/// A query that fans out over several counters gets back a stream of `(counter, sample)`
/// responses from many machines. Each response either seeds a new aggregator for its
/// `(counter, kind)` group or is merged into the existing one.
///
/// Like [`Aggregator`], this type is single-owner and unsynchronized.
#[derive(Debug)]
pub struct KeyedAggregator {
    storage: HashMap<(CounterPath, MergeKind), Aggregator>,
    mode: WindowMode,
    config: AggregatorConfig,
    rejected: usize,
}

impl KeyedAggregator {
    /// Create a keyed aggregator that merges with `mode`.
    pub fn new(mode: WindowMode) -> Self {
        Self::with_config(mode, AggregatorConfig::default())
    }

    /// Create a keyed aggregator whose groups use `config`.
    pub fn with_config(mode: WindowMode, config: AggregatorConfig) -> Self {
        Self {
            storage: HashMap::new(),
            mode,
            config,
            rejected: 0,
        }
    }

    /// Add one response for `counter`.
    ///
    /// Fails with [`AggregationError::UnsupportedKind`] if the sample's kind has no
    /// combination rule. Nothing is recorded for a rejected sample.
    pub fn insert(
        &mut self,
        counter: &CounterPath,
        sample: &Sample,
    ) -> Result<(), AggregationError> {
        let kind = sample.merge_kind()?;
        match self.storage.entry((counter.clone(), kind)) {
            Entry::Occupied(mut occupied) => occupied.get_mut().merge(sample, self.mode),
            Entry::Vacant(vacant) => {
                vacant.insert(Aggregator::with_config(sample, self.config.clone())?);
                Ok(())
            }
        }
    }

    /// Add one response for `counter`, dropping it with a warning if it cannot be merged.
    ///
    /// Returns whether the sample was recorded. Dropped samples are counted in
    /// [`KeyedAggregator::rejected`].
    pub fn insert_or_skip(&mut self, counter: &CounterPath, sample: &Sample) -> bool {
        match self.insert(counter, sample) {
            Ok(()) => true,
            Err(err) => {
                self.rejected += 1;
                tracing::warn!(%counter, %err, "dropping sample that cannot be aggregated");
                false
            }
        }
    }

    /// The aggregator for `counter` and `kind`, if any sample has been recorded for it.
    pub fn get(&self, counter: &CounterPath, kind: MergeKind) -> Option<&Aggregator> {
        self.storage.get(&(counter.clone(), kind))
    }

    /// Number of `(counter, kind)` groups.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Number of samples dropped by [`KeyedAggregator::insert_or_skip`].
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Take every aggregate, ordered by counter path and then kind.
    pub fn drain(&mut self) -> Vec<AggregatedSample> {
        let mut drained: Vec<_> = self.storage.drain().collect();
        drained.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        drained
            .into_iter()
            .map(|((counter, _), aggregator)| AggregatedSample {
                counter,
                sources: aggregator.merged_count() + 1,
                sample: aggregator.into_sample(),
            })
            .collect()
    }
}

impl Default for KeyedAggregator {
    fn default() -> Self {
        Self::new(WindowMode::default())
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use tally_core::{AggregationError, CounterPath, MergeKind, Sample, SampleKind};

    use super::KeyedAggregator;
    use crate::aggregator::WindowMode;

    fn path(s: &str) -> CounterPath {
        CounterPath::new(s).unwrap()
    }

    #[test]
    fn groups_by_counter_and_kind() {
        let mut keyed = KeyedAggregator::new(WindowMode::Union);
        let requests = path("/frontend/requests");
        let latency = path("/frontend/latency");

        keyed.insert(&requests, &Sample::hit_count(2)).unwrap();
        keyed.insert(&requests, &Sample::hit_count(3)).unwrap();
        keyed.insert(&latency, &Sample::maximum(10.0, 1)).unwrap();
        keyed.insert(&latency, &Sample::average(4.0, 2)).unwrap();
        keyed.insert(&latency, &Sample::maximum(12.0, 1)).unwrap();
        check!(keyed.len() == 3);

        let hits = keyed.get(&requests, MergeKind::HitCount).unwrap();
        check!(hits.accumulated().hit_count == 5);
        check!(keyed.get(&requests, MergeKind::Average).is_none());

        let drained = keyed.drain();
        check!(keyed.is_empty());
        let summary: Vec<_> = drained
            .iter()
            .map(|agg| (agg.counter.as_str(), agg.sample.kind, agg.sources))
            .collect();
        check!(
            summary
                == vec![
                    ("/frontend/latency", SampleKind::Maximum, 2),
                    ("/frontend/latency", SampleKind::Average, 1),
                    ("/frontend/requests", SampleKind::HitCount, 2),
                ]
        );
        check!(drained[0].sample.max_value == 12.0);
    }

    #[test]
    fn unsupported_kinds_are_reported() {
        let mut keyed = KeyedAggregator::default();
        let counter = path("/p99");
        let percentile = Sample {
            kind: SampleKind::Percentile,
            ..Sample::default()
        };
        let_assert!(Err(err) = keyed.insert(&counter, &percentile));
        check!(err == AggregationError::UnsupportedKind(SampleKind::Percentile));
        check!(keyed.is_empty());

        check!(!keyed.insert_or_skip(&counter, &percentile));
        check!(keyed.insert_or_skip(&counter, &Sample::hit_count(1)));
        check!(keyed.rejected() == 1);
        check!(keyed.len() == 1);
    }

    #[test]
    fn value_only_mode_keeps_seed_window() {
        let mut keyed = KeyedAggregator::new(WindowMode::ValueOnly);
        let counter = path("/requests");
        keyed.insert(&counter, &Sample::hit_count(1).with_window(10, 20)).unwrap();
        keyed.insert(&counter, &Sample::hit_count(1).with_window(0, 30)).unwrap();
        let drained = keyed.drain();
        check!(drained[0].sample.window().start_ms == 10);
        check!(drained[0].sample.window().end_ms == 20);
    }
}
