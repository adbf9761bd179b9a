// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The single-query [`Aggregator`].

use tally_core::{AggregationError, MergeKind, Sample};

use crate::config::AggregatorConfig;
use crate::value::{BucketSum, Max, Mean, MergeValue, Min, Sum};

/// Whether a merge also folds the incoming sample's time window into the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowMode {
    /// Merge the payload and widen the accumulated window to cover the incoming one.
    #[default]
    Union,
    /// Merge the payload only; the accumulated window is left as it is.
    ValueOnly,
}

/// Folds same-kind samples into one combined sample.
///
/// An aggregator is seeded with one sample and keeps that sample's [`MergeKind`] for its
/// whole life. It owns a copy of the seed, so nothing the caller does to the seed afterwards
/// can reach the accumulated state, and the accessors only hand out shared references or
/// clones.
///
/// Aggregators are meant to live for one fan-in step of one query: responses are merged one
/// at a time on a single thread (or through an externally synchronized tree reduction), and
/// the result is read once at the end.
///
/// # Example
///
/// ```
/// use tally_aggregation::Aggregator;
/// use tally_core::Sample;
///
/// let mut aggregator = Aggregator::new(&Sample::maximum(4.0, 10).with_window(0, 60_000))?;
/// aggregator.merge_with_window(&Sample::maximum(7.5, 3).with_window(60_000, 120_000))?;
///
/// let merged = aggregator.into_sample();
/// assert_eq!(merged.max_value, 7.5);
/// assert_eq!(merged.sample_count, 13);
/// assert_eq!((merged.start_time, merged.end_time), (0, 120_000));
/// # Ok::<(), tally_core::AggregationError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Aggregator {
    kind: MergeKind,
    accumulated: Sample,
    merged: usize,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator seeded with a copy of `seed`.
    ///
    /// Fails with [`AggregationError::UnsupportedKind`] if `seed` has no combination rule.
    pub fn new(seed: &Sample) -> Result<Self, AggregationError> {
        Self::with_config(seed, AggregatorConfig::default())
    }

    /// Create an aggregator seeded with a copy of `seed`, using `config`.
    pub fn with_config(seed: &Sample, config: AggregatorConfig) -> Result<Self, AggregationError> {
        let kind = seed.merge_kind()?;
        Ok(Self {
            kind,
            accumulated: seed.clone(),
            merged: 0,
            config,
        })
    }

    /// Create an aggregator from a seed that may be missing.
    ///
    /// A missing seed fails with [`AggregationError::InvalidArgument`].
    pub fn from_seed(seed: Option<&Sample>) -> Result<Self, AggregationError> {
        match seed {
            Some(seed) => Self::new(seed),
            None => Err(AggregationError::InvalidArgument("seed sample is required")),
        }
    }

    /// Seed an aggregator with the first of `samples` and merge the rest in order.
    ///
    /// Fails with [`AggregationError::InvalidArgument`] if `samples` is empty, and stops at
    /// the first sample that cannot be merged.
    pub fn fold<'a>(
        samples: impl IntoIterator<Item = &'a Sample>,
        mode: WindowMode,
    ) -> Result<Self, AggregationError> {
        let mut samples = samples.into_iter();
        let mut aggregator = Self::from_seed(samples.next())?;
        for sample in samples {
            aggregator.merge(sample, mode)?;
        }
        Ok(aggregator)
    }

    /// Merge `sample`'s payload and widen the accumulated window to cover it.
    ///
    /// Reversed windows on either side are put in order first, so the result always has
    /// `start_time <= end_time`.
    pub fn merge_with_window(&mut self, sample: &Sample) -> Result<(), AggregationError> {
        self.merge(sample, WindowMode::Union)
    }

    /// Merge `sample`'s payload, leaving the accumulated window untouched.
    pub fn merge_value_only(&mut self, sample: &Sample) -> Result<(), AggregationError> {
        self.merge(sample, WindowMode::ValueOnly)
    }

    /// Merge `sample` into the accumulator.
    ///
    /// A rejected sample leaves the accumulator unchanged.
    pub fn merge(&mut self, sample: &Sample, mode: WindowMode) -> Result<(), AggregationError> {
        if let Err(err) = self.check_kind(sample) {
            tracing::debug!(%err, "rejected sample");
            return Err(err);
        }

        let overflow = self.config.count_overflow;
        let accum = &mut self.accumulated;
        match self.kind {
            MergeKind::HitCount => Sum::merge(accum, sample, overflow),
            MergeKind::Histogram => BucketSum::merge(accum, sample, overflow),
            MergeKind::Minimum => Min::merge(accum, sample, overflow),
            MergeKind::Maximum => Max::merge(accum, sample, overflow),
            MergeKind::Average => Mean::merge(accum, sample, overflow),
        }
        if mode == WindowMode::Union {
            let window = accum.window().union(sample.window());
            accum.set_window(window);
        }

        self.merged += 1;
        tracing::trace!(kind = %self.kind, ?mode, merged = self.merged, "merged sample");
        Ok(())
    }

    fn check_kind(&self, sample: &Sample) -> Result<(), AggregationError> {
        match MergeKind::try_from(sample.kind) {
            Ok(kind) if kind == self.kind => Ok(()),
            _ => Err(AggregationError::KindMismatch {
                expected: self.kind,
                actual: sample.kind,
            }),
        }
    }

    /// The kind fixed at construction.
    pub fn kind(&self) -> MergeKind {
        self.kind
    }

    /// Number of samples merged since construction, not counting the seed.
    pub fn merged_count(&self) -> usize {
        self.merged
    }

    /// The configuration this aggregator was built with.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// The current accumulated sample.
    pub fn accumulated(&self) -> &Sample {
        &self.accumulated
    }

    /// A copy of the current accumulated sample.
    pub fn snapshot(&self) -> Sample {
        self.accumulated.clone()
    }

    /// Consume the aggregator, returning the accumulated sample.
    pub fn into_sample(self) -> Sample {
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use tally_core::{AggregationError, MergeKind, Sample, SampleKind};

    use super::{Aggregator, WindowMode};
    use crate::config::{AggregatorConfig, CountOverflow};

    #[test]
    fn rejected_merge_leaves_state_unchanged() {
        let mut aggregator = Aggregator::new(&Sample::hit_count(5).with_window(10, 20)).unwrap();
        let before = aggregator.snapshot();

        let wrong = Sample::average(1.0, 1).with_window(0, 100);
        let_assert!(Err(err) = aggregator.merge_with_window(&wrong));
        check!(
            err == AggregationError::KindMismatch {
                expected: MergeKind::HitCount,
                actual: SampleKind::Average,
            }
        );
        check!(aggregator.accumulated() == &before);
        check!(aggregator.merged_count() == 0);
    }

    #[test]
    fn unmergeable_incoming_kind_is_a_mismatch() {
        let mut aggregator = Aggregator::new(&Sample::hit_count(5)).unwrap();
        let unset = Sample {
            hit_count: 100,
            ..Sample::default()
        };
        let result = aggregator.merge_value_only(&unset);
        let_assert!(Err(AggregationError::KindMismatch { actual, .. }) = result);
        check!(actual == SampleKind::Unset);
        check!(aggregator.accumulated().hit_count == 5);
    }

    #[test]
    fn merge_modes() {
        let mut aggregator = Aggregator::new(&Sample::hit_count(1).with_window(100, 200)).unwrap();
        aggregator
            .merge(&Sample::hit_count(1).with_window(0, 50), WindowMode::ValueOnly)
            .unwrap();
        check!(aggregator.accumulated().window().start_ms == 100);

        aggregator
            .merge(&Sample::hit_count(1).with_window(0, 50), WindowMode::Union)
            .unwrap();
        check!(aggregator.accumulated().window().start_ms == 0);
        check!(aggregator.accumulated().window().end_ms == 200);
        check!(aggregator.accumulated().hit_count == 3);
        check!(aggregator.merged_count() == 2);
    }

    #[test]
    fn config_applies_to_merges() {
        let config = AggregatorConfig::new().with_count_overflow(CountOverflow::Wrap);
        let mut aggregator = Aggregator::with_config(&Sample::hit_count(u64::MAX), config).unwrap();
        aggregator.merge_value_only(&Sample::hit_count(1)).unwrap();
        check!(aggregator.accumulated().hit_count == 0);
        check!(aggregator.config().count_overflow == CountOverflow::Wrap);

        let mut saturating = Aggregator::new(&Sample::hit_count(u64::MAX)).unwrap();
        saturating.merge_value_only(&Sample::hit_count(1)).unwrap();
        check!(saturating.accumulated().hit_count == u64::MAX);
    }

    #[test]
    fn fold_stops_at_first_bad_sample() {
        let samples = [Sample::hit_count(1), Sample::minimum(1.0, 1), Sample::hit_count(2)];
        let result = Aggregator::fold(&samples, WindowMode::Union);
        let_assert!(Err(AggregationError::KindMismatch { .. }) = result);

        let samples = [Sample::hit_count(1), Sample::hit_count(2)];
        let_assert!(Ok(aggregator) = Aggregator::fold(&samples, WindowMode::Union));
        check!(aggregator.into_sample().hit_count == 3);
    }
}
