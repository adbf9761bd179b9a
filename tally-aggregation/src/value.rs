// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Strategies for merging sample payloads.
//!
//! Each strategy merges the payload fields of one [`MergeKind`] and leaves every other field
//! alone, including the time window. All strategies are commutative and associative, so a
//! set of samples folds to the same result in any order (up to floating-point rounding for
//! [`Mean`]).
//!
//! [`MergeKind`]: tally_core::MergeKind

use tally_core::Sample;

use crate::config::CountOverflow;

/// Defines how the payload of an incoming sample is merged into an accumulator.
pub trait MergeValue {
    /// Merge `incoming`'s payload into `accum`.
    fn merge(accum: &mut Sample, incoming: &Sample, overflow: CountOverflow);
}

/// Sums hit counts.
pub struct Sum;

impl MergeValue for Sum {
    fn merge(accum: &mut Sample, incoming: &Sample, overflow: CountOverflow) {
        accum.hit_count = overflow.add(accum.hit_count, incoming.hit_count);
    }
}

/// Sums histogram buckets key by key.
///
/// Keys only present in the accumulator are untouched; keys only present in the incoming
/// sample are inserted with their count.
pub struct BucketSum;

impl MergeValue for BucketSum {
    fn merge(accum: &mut Sample, incoming: &Sample, overflow: CountOverflow) {
        for (key, count) in incoming.histogram.iter() {
            accum
                .histogram
                .record_with(key, count, |a, b| overflow.add(a, b));
        }
    }
}

/// Keeps the largest `max_value` and sums observation counts.
pub struct Max;

impl MergeValue for Max {
    fn merge(accum: &mut Sample, incoming: &Sample, overflow: CountOverflow) {
        accum.max_value = accum.max_value.max(incoming.max_value);
        accum.sample_count = overflow.add(accum.sample_count, incoming.sample_count);
    }
}

/// Keeps the smallest `min_value` and sums observation counts.
pub struct Min;

impl MergeValue for Min {
    fn merge(accum: &mut Sample, incoming: &Sample, overflow: CountOverflow) {
        accum.min_value = accum.min_value.min(incoming.min_value);
        accum.sample_count = overflow.add(accum.sample_count, incoming.sample_count);
    }
}

/// Combines running means weighted by their observation counts. See [`combine_means`].
pub struct Mean;

impl MergeValue for Mean {
    fn merge(accum: &mut Sample, incoming: &Sample, overflow: CountOverflow) {
        let (average, sample_count) = combine_means(
            (accum.average, accum.sample_count),
            (incoming.average, incoming.sample_count),
            overflow,
        );
        accum.average = average;
        accum.sample_count = sample_count;
    }
}

/// Combine two `(mean, count)` pairs into one.
///
/// The combined mean is computed by interpolating from `a` towards `b` by `b`'s share of the
/// total count, so no `mean * count` product is ever formed. This keeps the result finite
/// for means near `f64::MAX` and counts near `u64::MAX`. The result is clamped to lie
/// between the two input means, and when their difference itself overflows (extremes of
/// opposite sign) the interpolation is done as a convex combination instead.
///
/// The weight comes from the exact total, so it does not depend on argument order or on
/// `overflow`, which only applies to the returned count. Two empty inputs yield a mean of
/// zero.
pub fn combine_means(a: (f64, u64), b: (f64, u64), overflow: CountOverflow) -> (f64, u64) {
    let (mean_a, count_a) = a;
    let (mean_b, count_b) = b;
    let count = overflow.add(count_a, count_b);
    if count_a == 0 && count_b == 0 {
        return (0.0, 0);
    }

    let weight = count_b as f64 / (count_a as f64 + count_b as f64);
    let delta = mean_b - mean_a;
    let mean = if delta.is_finite() {
        mean_a + delta * weight
    } else {
        mean_a * (1.0 - weight) + mean_b * weight
    };

    // NaN inputs fail every comparison below and propagate unchanged
    let (lo, hi) = if mean_a <= mean_b {
        (mean_a, mean_b)
    } else {
        (mean_b, mean_a)
    };
    let mean = if mean < lo {
        lo
    } else if mean > hi {
        hi
    } else {
        mean
    };
    (mean, count)
}
